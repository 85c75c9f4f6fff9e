use colored::Colorize;

use crate::application::services::{QuickCycleOutcome, Sentinel};

/// Run one quick cycle and print what it found.
pub async fn run_check(sentinel: &Sentinel<'_>) -> QuickCycleOutcome {
    let outcome = sentinel.run_quick_cycle().await;
    print_outcome(outcome);
    outcome
}

fn print_outcome(outcome: QuickCycleOutcome) {
    if outcome.alerts_raised == 0 {
        println!("{}", "\u{2714} Site and deployment are up".green().bold());
        return;
    }
    let summary = format!(
        "{} outage alert(s) raised, {} delivered",
        outcome.alerts_raised, outcome.alerts_delivered
    );
    if outcome.alerts_delivered < outcome.alerts_raised {
        println!("{}", summary.red().bold());
    } else {
        println!("{}", summary.yellow().bold());
    }
}
