use std::time::{Duration, Instant};

use tracing::info;

use crate::cli::config::AppConfig;
use crate::clock::duration_from_secs;
use crate::host::scripted::{ReplayScript, ScriptedHost};
use crate::lifecycle::coordinator::AccessibilityEngine;
use crate::speech::backend::Availability;
use crate::speech::detect::screen_reader_running;
use crate::speech::manager::BackendStatus;
use crate::speech::registry::BackendRegistry;
use crate::trace::logger::TraceLogger;

// ============================================================================
// replay subcommand
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct ReplaySummary {
    pub frames: u64,
    pub announcements: Vec<String>,
}

/// Drive the engine through a recorded host session.
///
/// Time is simulated (`frame_ms` per frame) unless `realtime` is set, in
/// which case each frame also sleeps so speech has time to play.
pub fn cmd_replay(
    config: &AppConfig,
    script_path: &str,
    trace: Option<&str>,
    frame_ms: Option<u64>,
    realtime: bool,
) -> Result<ReplaySummary, Box<dyn std::error::Error>> {
    let script = ReplayScript::load(script_path)?;
    let frame = Duration::from_millis(frame_ms.unwrap_or(script.frame_ms));

    let tracer = trace.map(TraceLogger::new).unwrap_or_else(TraceLogger::disabled);
    let mut engine =
        AccessibilityEngine::from_config(config, &BackendRegistry::with_defaults()).with_tracer(tracer);

    info!(
        "Replaying {} frames from {} ({} ms per frame)",
        script.frame_count(),
        script_path,
        frame.as_millis()
    );

    let summary = replay(&mut engine, &script, frame, realtime);
    println!(
        "Replayed {} frames, {} announcements",
        summary.frames,
        summary.announcements.len()
    );
    Ok(summary)
}

/// Run a parsed script through `engine` on a fresh scripted host.
pub fn replay(
    engine: &mut AccessibilityEngine,
    script: &ReplayScript,
    frame: Duration,
    realtime: bool,
) -> ReplaySummary {
    let mut host = ScriptedHost::new();
    engine.attach(&mut host);

    let mut clock = Instant::now();
    let mut summary = ReplaySummary::default();

    for step in &script.frames {
        host.apply_frame(step);

        for _ in 0..step.repeat.max(1) {
            let now = if realtime { Instant::now() } else { clock };

            let report = engine.tick(&mut host, now);
            summary.announcements.extend(report.announcements());
            summary.frames += 1;

            if realtime {
                std::thread::sleep(frame);
            }
            // Holds at the last instant on overflow
            clock = clock.checked_add(frame).unwrap_or(clock);
        }
    }

    engine.detach(&mut host);
    summary
}

// ============================================================================
// say subcommand
// ============================================================================

/// Speak one line; returns whether any backend accepted it.
pub fn cmd_say(config: &AppConfig, text: &str, interrupt: bool) -> bool {
    let registry = BackendRegistry::with_defaults();
    let mut engine = AccessibilityEngine::from_config(config, &registry);
    engine.speech_mut().probe_all();

    let outcome = engine.announce(text, interrupt);
    match outcome.backend() {
        Some(backend) => println!("Spoke via {}", backend),
        None if outcome.is_success() => println!("Nothing to say"),
        None => println!("No speech backend available"),
    }
    outcome.is_success()
}

// ============================================================================
// backends subcommand
// ============================================================================

pub fn cmd_backends(config: &AppConfig) {
    let registry = BackendRegistry::with_defaults();
    let mut manager = registry.build_manager(
        &config.backends,
        duration_from_secs(config.engine.probe_interval_secs),
    );
    manager.probe_all();
    print!("{}", format_backend_report(&manager.statuses()));

    let reader = if screen_reader_running() { "running" } else { "not detected" };
    println!("Screen reader: {}", reader);
}

/// Format backend availability for the terminal.
///
/// ```text
/// ✓ nvda (priority 0)
/// ✗ system-tts (priority 10)
/// ```
pub fn format_backend_report(statuses: &[BackendStatus]) -> String {
    if statuses.is_empty() {
        return "No speech backends configured\n".to_string();
    }

    let mut out = String::new();
    for status in statuses {
        let marker = match status.availability {
            Availability::Available => "\u{2713}",
            Availability::Unavailable => "\u{2717}",
            Availability::Unknown => "?",
        };
        out.push_str(&format!(
            "{} {} (priority {})\n",
            marker, status.name, status.priority
        ));
    }
    out
}
