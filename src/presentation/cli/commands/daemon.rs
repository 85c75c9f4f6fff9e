use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use super::briefing::run_full_briefing;
use crate::application::services::{Aggregator, Sentinel};
use crate::domain::ports::notifier::Notifier;

/// When the two cycles fire.
#[derive(Debug, Clone, Copy)]
pub struct Schedule {
    pub quick_interval: Duration,
    pub tz: Tz,
    pub briefing_hour: u32,
    pub briefing_on_start: bool,
}

/// Next occurrence of `hour:00` in `tz` strictly after `now`.
///
/// A local hour skipped by a DST transition moves the briefing to the next
/// day that has it.
#[must_use]
pub fn next_briefing_at(now: DateTime<Utc>, tz: Tz, hour: u32) -> DateTime<Utc> {
    now.with_timezone(&tz)
        .date_naive()
        .iter_days()
        .take(3)
        .filter_map(|day| day.and_hms_opt(hour, 0, 0))
        .filter_map(|local| tz.from_local_datetime(&local).earliest())
        .map(|at| at.with_timezone(&Utc))
        .find(|at| *at > now)
        .unwrap_or_else(|| now + chrono::Duration::days(1))
}

/// Run the scheduler until Ctrl+C.
///
/// Quick cycles fire every `schedule.quick_interval`; the full briefing fires
/// once a day at `schedule.briefing_hour` local time. Both run inline in one
/// loop, so a cycle never overlaps another run of itself, and a late tick is
/// skipped rather than replayed. A briefing that falls due while a quick cycle
/// is running is sent as soon as that cycle ends. SIGTERM is not handled.
///
/// # Errors
///
/// Currently infallible; cycle failures are logged and never stop the loop.
pub async fn run_daemon(
    aggregator: &Aggregator<'_>,
    sentinel: &Sentinel<'_>,
    notifier: &dyn Notifier,
    schedule: Schedule,
) -> anyhow::Result<()> {
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Cannot listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };
    run_until(aggregator, sentinel, notifier, schedule, Utc::now, shutdown).await;
    println!("\nStopping opswatch...");
    Ok(())
}

async fn run_until(
    aggregator: &Aggregator<'_>,
    sentinel: &Sentinel<'_>,
    notifier: &dyn Notifier,
    schedule: Schedule,
    clock: impl Fn() -> DateTime<Utc>,
    shutdown: impl Future<Output = ()>,
) {
    tracing::info!(
        quick_interval_secs = schedule.quick_interval.as_secs(),
        briefing_hour = schedule.briefing_hour,
        timezone = %schedule.tz,
        "Daemon started"
    );
    let mut quick = tokio::time::interval(schedule.quick_interval);
    quick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let mut last_briefing: Option<NaiveDate> = None;
    if schedule.briefing_on_start {
        daily_briefing(aggregator, notifier, schedule.tz, clock(), &mut last_briefing).await;
    }

    let mut next_briefing = next_briefing_at(clock(), schedule.tz, schedule.briefing_hour);
    tracing::debug!("Next briefing at {next_briefing}");

    tokio::pin!(shutdown);
    loop {
        let until_briefing = (next_briefing - clock()).to_std().unwrap_or(Duration::ZERO);

        tokio::select! {
            _ = quick.tick() => {
                let outcome = sentinel.run_quick_cycle().await;
                if outcome.alerts_raised > 0 {
                    tracing::info!(
                        "Quick cycle: {} alert(s), {} delivered",
                        outcome.alerts_raised,
                        outcome.alerts_delivered
                    );
                }
            }
            () = tokio::time::sleep(until_briefing) => {}
            () = &mut shutdown => {
                tracing::info!("Shutdown signal received");
                break;
            }
        }

        // Whichever branch ran, a slot that has come due is served now.
        if clock() >= next_briefing {
            daily_briefing(aggregator, notifier, schedule.tz, clock(), &mut last_briefing).await;
            next_briefing = next_briefing_at(clock(), schedule.tz, schedule.briefing_hour);
            tracing::debug!("Next briefing at {next_briefing}");
        }
    }
}

/// Full cycle, at most once per local calendar day.
async fn daily_briefing(
    aggregator: &Aggregator<'_>,
    notifier: &dyn Notifier,
    tz: Tz,
    now: DateTime<Utc>,
    last_briefing: &mut Option<NaiveDate>,
) {
    let today = now.with_timezone(&tz).date_naive();
    if *last_briefing == Some(today) {
        tracing::debug!("Briefing already sent today, skipping");
        return;
    }
    *last_briefing = Some(today);
    if run_full_briefing(aggregator, notifier).await {
        tracing::info!("Daily briefing delivered");
    }
}
