use crate::application::services::Aggregator;
use crate::application::services::dispatch::deliver_report;
use crate::domain::entities::report::AggregateReport;
use crate::domain::ports::notifier::Notifier;

/// Run one full cycle and deliver the briefing through `notifier`.
pub async fn run_full_briefing(aggregator: &Aggregator<'_>, notifier: &dyn Notifier) -> bool {
    let report = aggregator.run_full_cycle().await;
    deliver_report(notifier, &report).await
}

/// One-shot briefing: print the report as JSON, or deliver it.
///
/// # Errors
///
/// Returns an error if JSON serialization fails or the briefing could not
/// be delivered.
pub async fn run_briefing(
    aggregator: &Aggregator<'_>,
    notifier: &dyn Notifier,
    json: bool,
) -> anyhow::Result<()> {
    if json {
        let report = aggregator.run_full_cycle().await;
        print_report_json(&report)?;
        return Ok(());
    }

    if !run_full_briefing(aggregator, notifier).await {
        anyhow::bail!("briefing was not delivered");
    }
    Ok(())
}

fn print_report_json(report: &AggregateReport) -> anyhow::Result<()> {
    let output = serde_json::to_string_pretty(report)?;
    println!("{output}");
    Ok(())
}
