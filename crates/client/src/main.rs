//! Scenario replay entry point.
//!
//! Usage: `furnace-replay <scenario.ron>`
use anyhow::{Context, Result, bail};
use furnace_client::{LoggingEmitter, ReplayConfig, logging};
use runtime::{Scenario, Session, TickOutcome, TickReport};

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let replay = ReplayConfig::from_env(std::env::args().skip(1));
    logging::setup_logging(replay.session_id.as_deref())?;

    let Some(path) = replay.scenario.as_deref() else {
        bail!("usage: furnace-replay <scenario.ron> (or set FURNACE_SCENARIO)");
    };
    let scenario = Scenario::load_from_file(path)
        .with_context(|| format!("loading scenario {}", path.display()))?;
    let config = replay.runtime_config(scenario.config.clone())?;

    let mut session = Session::new(config).context("starting session")?;
    let mut emitter = LoggingEmitter::new();
    let reports = scenario.replay(&mut session, &mut emitter);
    session.stop();

    println!("scenario: {} ({} frames)", scenario.name, reports.len());
    for report in &reports {
        println!("{}", describe(report));
    }

    let stats = session.stats();
    println!();
    println!(
        "ticks: {}  skipped: {}  interrupted: {}  idle: {}",
        stats.ticks(),
        stats.skipped(),
        stats.interrupted(),
        stats.idle()
    );
    println!(
        "submitted: {}  dispatched: {}  inputs: {}",
        stats.submitted(),
        stats.dispatched(),
        emitter.inputs()
    );
    println!(
        "notices: {}  needing a human: {}",
        stats.notices(),
        stats.needs_human()
    );
    for (state, ticks) in stats.by_state() {
        println!("  {state:<22} {ticks}");
    }
    for notice in emitter.notices() {
        println!("notice: {notice}");
    }
    Ok(())
}

fn describe(report: &TickReport) -> String {
    let intent = report
        .outcome
        .intent()
        .map(|intent| intent.label())
        .unwrap_or("-");
    let body = match &report.outcome {
        TickOutcome::Skipped(reason) => format!("skipped ({reason:?})"),
        TickOutcome::Interrupt(tick) => format!("interrupt {tick:?}"),
        TickOutcome::Decision(decision) => format!(
            "{:<22} {:<24} {intent}",
            decision
                .state
                .map(|state| state.to_string())
                .unwrap_or_else(|| "idle".to_owned()),
            decision.rule().unwrap_or("-"),
        ),
    };
    let dispatched = if report.dispatched.is_some() {
        "  [dispatched]"
    } else {
        ""
    };
    format!("{:>4}  {body}{dispatched}", report.frame)
}
