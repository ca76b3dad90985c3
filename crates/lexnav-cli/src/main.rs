mod display;
mod interactive;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand};
use lexnav_core::{Document, DocumentSource};
use lexnav_outline::{
    NavTimings, Navigator, render_outline_html, render_quick_reference_html, render_tab_bar,
};
use lexnav_search::{
    ActFilter, FieldFilter, MAX_RESULTS, QueryState, SearchConfig, SearchEngine, count_label,
    render_hits,
};

use crate::display::TerminalOutline;

/// Search and browse statute books (Act → Chapter → Section).
#[derive(Parser, Debug)]
#[command(name = "lexnav", version, about)]
struct Cli {
    /// Statute document: a JSON file path or an http(s) URL.
    #[arg(long, env = "LEXNAV_DATA", default_value = "./data/legal-acts.json", global = true)]
    data: String,

    /// Cap on results returned per search.
    #[arg(
        long,
        env = "LEXNAV_MAX_RESULTS",
        default_value_t = MAX_RESULTS,
        global = true,
        value_parser = positive_count()
    )]
    max_results: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one search and print the results.
    Search {
        query: String,
        /// Restrict to one Act id, or `all`.
        #[arg(long, default_value = "all")]
        act: String,
        /// section | title | content | all
        #[arg(long, default_value = "all")]
        field: FieldFilter,
        /// Override the result cap for this search.
        #[arg(long, value_parser = positive_count())]
        limit: Option<usize>,
    },
    /// Print the chapter/section outline of one Act, or all of them.
    Outline { act: Option<String> },
    /// Print the quick reference list.
    Quickref,
    /// Navigate to a section by id and print it.
    Show { section_id: String },
    /// Render the tab bar, outline and quick reference as HTML.
    Html {
        /// Write to a file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Report document statistics and integrity problems.
    Check,
    /// Search as you type, one line per input change.
    Interactive,
}

/// A result cap of zero would report matches as capped while showing none.
fn positive_count() -> RangedU64ValueParser<usize> {
    RangedU64ValueParser::<usize>::new().range(1..)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    tracing::info!("lexnav v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let source = DocumentSource::parse(&cli.data);
    let doc = Arc::new(
        source
            .load()
            .await
            .with_context(|| format!("loading statute document from {source}"))?,
    );
    let config = SearchConfig {
        max_results: cli.max_results,
        ..SearchConfig::default()
    };

    match cli.command {
        Commands::Search {
            query,
            act,
            field,
            limit,
        } => {
            let config = SearchConfig {
                max_results: limit.unwrap_or(config.max_results),
                ..config
            };
            cmd_search(doc, config, &query, &act, field);
        }
        Commands::Outline { act } => {
            if let Some(id) = act.as_deref() {
                anyhow::ensure!(doc.act(id).is_some(), "unknown act: {id}");
            }
            display::print_outline(&doc, act.as_deref(), None);
        }
        Commands::Quickref => display::print_quick_reference(&doc),
        Commands::Show { section_id } => {
            let outline = Arc::new(TerminalOutline::new(Arc::clone(&doc)));
            let navigator = Navigator::new(doc, outline, NavTimings::immediate());
            if !navigator.expand_to_section(&section_id).await {
                tracing::debug!(section_id = %section_id, "no such section");
            }
        }
        Commands::Html { out } => cmd_html(&doc, out).await?,
        Commands::Check => cmd_check(&doc),
        Commands::Interactive => {
            let engine = Arc::new(SearchEngine::with_config(doc, config));
            interactive::run(engine).await?;
        }
    }

    Ok(())
}

fn cmd_search(
    doc: Arc<Document>,
    config: SearchConfig,
    query: &str,
    act: &str,
    field: FieldFilter,
) {
    let engine = SearchEngine::with_config(doc, config);
    let state = QueryState::new(query, ActFilter::from(act), field);
    let outcome = engine.search(&state);
    if outcome.is_cleared() {
        eprintln!("Empty query.");
        return;
    }
    let hits = render_hits(&outcome, query);
    display::print_results(&count_label(hits.len(), outcome.is_capped()), &hits, query);
}

async fn cmd_html(doc: &Arc<Document>, out: Option<PathBuf>) -> anyhow::Result<()> {
    // Render against a fresh navigator so the markup reflects the initial page.
    let outline = Arc::new(TerminalOutline::new(Arc::clone(doc)));
    let navigator = Navigator::new(Arc::clone(doc), outline, NavTimings::immediate());
    let state = navigator.state();
    let html = format!(
        "{}\n{}\n{}\n",
        render_tab_bar(doc, &state),
        render_outline_html(doc, &state),
        render_quick_reference_html(doc),
    );
    match out {
        Some(path) => {
            tokio::fs::write(&path, html)
                .await
                .with_context(|| format!("writing {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => print!("{html}"),
    }
    Ok(())
}

fn cmd_check(doc: &Document) {
    let stats = doc.stats();
    println!(
        "{} acts, {} chapters, {} sections",
        stats.acts, stats.chapters, stats.sections
    );

    let dangling = doc.dangling_quick_references();
    if dangling.is_empty() {
        println!("Quick references: all resolve");
    } else {
        println!("Quick references that resolve to no section:");
        for d in &dangling {
            println!("  {} section {}", d.act_id, d.section);
        }
    }

    let dupes = doc.duplicate_section_ids();
    if !dupes.is_empty() {
        println!("Duplicate section ids:");
        for id in &dupes {
            println!("  {id}");
        }
    }
}
