//! Line-driven search session: every plain line is the new value of the
//! search box, fed through the debounced path. Lines starting with `:` are
//! control commands.

use std::sync::Arc;
use std::time::Duration;

use lexnav_outline::{Browser, NavTimings};
use lexnav_search::{ActFilter, FieldFilter, SearchEngine};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::display::{self, TerminalOutline, TerminalResults};

const HELP: &str = "\
Type to search. Commands:
  :act <id|all>        restrict to one act
  :field <section|title|content|all>
  :ref <number> <act>  quick reference lookup
  :refs                list quick references
  :open <n>            open result n in the outline
  :outline             show the outline state
  :clear               clear the search
  :quit";

enum Step {
    Continue,
    Quit,
}

pub async fn run(engine: Arc<SearchEngine>) -> anyhow::Result<()> {
    let doc = Arc::clone(engine.document());
    let debounce = engine.config().debounce;
    let results = Arc::new(TerminalResults::default());
    let outline = Arc::new(TerminalOutline::new(Arc::clone(&doc)));
    let mut browser = Browser::new(engine, Arc::clone(&results), outline, NavTimings::immediate());

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match step(&mut browser, &results, line.trim_end()).await {
            Step::Continue => {}
            Step::Quit => break,
        }
    }

    // Let a search typed just before EOF finish.
    if browser.search().has_pending() {
        tokio::time::sleep(debounce + Duration::from_millis(10)).await;
    }
    Ok(())
}

async fn step(
    browser: &mut Browser<TerminalResults, TerminalOutline>,
    results: &TerminalResults,
    line: &str,
) -> Step {
    let Some(command) = line.strip_prefix(':') else {
        results.set_query(line);
        browser.search().input(line);
        return Step::Continue;
    };

    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("quit" | "q"), _, _) => return Step::Quit,
        (Some("act"), Some(id), _) => {
            browser.search().set_act_filter(ActFilter::from(id));
        }
        (Some("field"), Some(field), _) => match field.parse::<FieldFilter>() {
            Ok(field) => {
                browser.search().set_field_filter(field);
            }
            Err(e) => eprintln!("{e}"),
        },
        (Some("ref"), Some(number), Some(act_id)) => {
            results.set_query(number);
            browser.quick_reference_lookup(number, act_id);
        }
        (Some("refs"), _, _) => display::print_quick_reference(browser.navigator().document()),
        (Some("open"), Some(n), _) => {
            let summary = browser.search().last_summary();
            let hit = n
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| summary.hits().get(i));
            match hit {
                Some(hit) => {
                    browser.open_hit(&hit.section_id).await;
                }
                None => eprintln!("no result {n}"),
            }
        }
        (Some("outline"), _, _) => {
            let navigator = browser.navigator();
            let state = navigator.state();
            display::print_outline(navigator.document(), state.active_act(), Some(&state));
        }
        (Some("clear"), _, _) => browser.search().clear(),
        _ => println!("{HELP}"),
    }
    Step::Continue
}
