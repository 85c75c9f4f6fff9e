use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use opswatch::application::config::AppConfig;
use opswatch::application::services::{Aggregator, CheckSet, Sentinel};
use opswatch::domain::ports::notifier::Notifier;
use opswatch::domain::rules::AlertClassifier;
use opswatch::infrastructure::checks::{
    DatastoreCheck, DeploymentCheck, InboxCheck, IssueTrackerCheck, UptimeCheck,
};
use opswatch::infrastructure::notifications::{CompositeNotifier, TerminalNotifier, WebhookNotifier};
use opswatch::presentation::cli::app::{Cli, Commands};
use opswatch::presentation::cli::commands::briefing::run_briefing;
use opswatch::presentation::cli::commands::check::run_check;
use opswatch::presentation::cli::commands::daemon::{Schedule, run_daemon};

fn print_banner() {
    println!("{}", "\u{2501}".repeat(40).cyan());
    println!("{}", "  OPSWATCH: operations watchdog".bold().cyan());
    println!("{}", "\u{2501}".repeat(40).cyan());
}

fn setup_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose);

    // Configuration faults are the only fatal errors.
    let config = AppConfig::load(cli.config.as_deref())?;
    config.validate()?;
    let tz = config.timezone()?;

    // Manual DI: main.rs is the only place that knows concrete types
    let uptime = UptimeCheck::from_config(&config.uptime)?;
    let datastore = DatastoreCheck::from_config(&config.datastore);
    let issues = IssueTrackerCheck::from_config(&config.issues)?;
    let deployment = DeploymentCheck::from_config(&config.deployment)?;
    let inbox = InboxCheck::from_config(&config.inbox)?;
    let checks = CheckSet {
        uptime: &uptime,
        datastore: &datastore,
        issues: &issues,
        deployment: &deployment,
        inbox: &inbox,
    };

    // Composite notifier: webhook + optional terminal echo
    let mut gateways: Vec<Box<dyn Notifier>> = Vec::new();
    if let Some(ref url) = config.notifications.webhook_url {
        gateways.push(Box::new(WebhookNotifier::new(url.clone(), tz)?));
    }
    if config.notifications.terminal {
        gateways.push(Box::new(TerminalNotifier::new(tz)));
    }
    let notifier = CompositeNotifier::new(gateways);

    let classifier = AlertClassifier::default();
    let deadline = Duration::from_secs(config.general.check_deadline_secs);
    let aggregator = Aggregator::new(checks, &classifier, deadline);
    let sentinel = Sentinel::new(checks, &notifier, deadline);

    let command = cli.command.unwrap_or(Commands::Daemon {
        briefing_on_start: false,
    });
    match command {
        Commands::Briefing { json, dry_run } => {
            if dry_run {
                run_briefing(&aggregator, &TerminalNotifier::new(tz), json).await?;
            } else {
                run_briefing(&aggregator, &notifier, json).await?;
            }
        }
        Commands::Check => {
            run_check(&sentinel).await;
        }
        Commands::Daemon { briefing_on_start } => {
            print_banner();
            let schedule = Schedule {
                quick_interval: Duration::from_secs(config.general.quick_interval_secs),
                tz,
                briefing_hour: config.general.briefing_hour,
                briefing_on_start,
            };
            run_daemon(&aggregator, &sentinel, &notifier, schedule).await?;
        }
    }

    Ok(())
}
