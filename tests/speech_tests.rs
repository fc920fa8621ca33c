mod common;

use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use common::{Call, SpeechLog, manager_with, ms};
use screen_narrator::{
    cli::config::BackendConfig,
    speech::{
        backend::{AnnounceOutcome, Availability, SpeechBackend},
        command::{CommandBackend, program_on_path},
        console::ConsoleBackend,
        detect::is_screen_reader_process,
        http::HttpBackend,
        manager::{SpeechManager, SpeechStatus},
        registry::BackendRegistry,
    },
};

// =========================================================================
// announce: ordering and fallback
// =========================================================================

#[test]
fn empty_text_is_a_successful_no_op() {
    let log = SpeechLog::default();
    let (mut manager, _) = manager_with(&[("a", 0)], &log);

    let outcome = manager.announce("", true);
    assert_eq!(outcome, AnnounceOutcome::Skipped);
    assert!(outcome.is_success());
    assert!(log.calls().is_empty(), "No backend is touched for empty text");

    assert_eq!(manager.announce("   ", false), AnnounceOutcome::Skipped);
}

#[test]
fn highest_priority_available_backend_speaks() {
    let log = SpeechLog::default();
    let (mut manager, _) = manager_with(&[("fallback", 50), ("screen-reader", 0)], &log);
    manager.probe_all();

    let outcome = manager.announce("Start", false);
    assert_eq!(outcome.backend(), Some("screen-reader"));
    assert_eq!(log.spoken_by("screen-reader"), vec!["Start"]);
    assert!(log.spoken_by("fallback").is_empty());
}

#[test]
fn equal_priorities_keep_declaration_order() {
    let log = SpeechLog::default();
    let (mut manager, _) = manager_with(&[("first", 5), ("second", 5)], &log);
    manager.probe_all();

    let names: Vec<String> = manager.statuses().into_iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["first", "second"]);
    assert_eq!(manager.announce("Hello", false).backend(), Some("first"));
}

#[test]
fn failing_backend_falls_back_within_same_call() {
    let log = SpeechLog::default();
    let (mut manager, switches) = manager_with(&[("a", 0), ("b", 1)], &log);
    manager.probe_all();
    assert_eq!(manager.availability("a"), Some(Availability::Available));

    // A still probes fine but its speak call fails
    switches[0].set_speak(false);

    let outcome = manager.announce("Continue", true);
    assert_eq!(outcome, AnnounceOutcome::Delivered { backend: "b".into() });
    assert_eq!(manager.availability("a"), Some(Availability::Unavailable));
    assert_eq!(log.spoken_by("b"), vec!["Continue"]);
}

#[test]
fn failed_backend_stays_unavailable_until_next_probe_window() {
    let log = SpeechLog::default();
    let (mut manager, switches) = manager_with(&[("a", 0), ("b", 1)], &log);
    let t0 = Instant::now();
    assert!(manager.refresh(t0), "First refresh always probes");

    switches[0].set_speak(false);
    manager.announce("one", false);
    switches[0].set_speak(true);

    // A recovered, but it is not retried until the probe window elapses
    let probes_before = log.probes_of("a");
    assert_eq!(manager.announce("two", false).backend(), Some("b"));
    assert!(!manager.refresh(ms(t0, 5_000)), "Probe window not elapsed");
    assert_eq!(manager.announce("three", false).backend(), Some("b"));
    assert_eq!(log.probes_of("a"), probes_before, "No probe storm against A");

    assert!(manager.refresh(ms(t0, 10_000)));
    assert_eq!(manager.availability("a"), Some(Availability::Available));
    assert_eq!(manager.announce("four", false).backend(), Some("a"));
}

#[test]
fn total_exhaustion_drops_announcement() {
    let log = SpeechLog::default();
    let (mut manager, switches) = manager_with(&[("a", 0), ("b", 1)], &log);
    for s in &switches {
        s.set_up(false);
    }
    manager.probe_all();

    let before = manager.statuses();
    let outcome = manager.announce("Start", true);
    assert_eq!(outcome, AnnounceOutcome::Dropped);
    assert!(!outcome.is_success());
    assert!(log.spoken().is_empty());
    assert_eq!(manager.statuses(), before, "Engine state unchanged");
}

#[test]
fn no_backends_drops_without_panicking() {
    let mut manager = SpeechManager::default();
    assert!(manager.is_empty());
    assert_eq!(manager.announce("Start", true), AnnounceOutcome::Dropped);
}

#[test]
fn unknown_backend_is_probed_on_first_use() {
    let log = SpeechLog::default();
    let (mut manager, _) = manager_with(&[("a", 0)], &log);
    assert_eq!(manager.availability("a"), Some(Availability::Unknown));

    assert_eq!(manager.announce("Hello", false).backend(), Some("a"));
    assert_eq!(log.probes_of("a"), 1);
    assert_eq!(manager.availability("a"), Some(Availability::Available));
}

#[test]
fn lower_backend_reprobed_when_higher_one_fails_mid_call() {
    let log = SpeechLog::default();
    let (mut manager, switches) = manager_with(&[("a", 0), ("b", 1)], &log);

    // B is down at the periodic probe, A is up
    switches[1].set_up(false);
    manager.probe_all();
    assert_eq!(manager.availability("b"), Some(Availability::Unavailable));

    // B comes back; A then fails while speaking
    switches[1].set_up(true);
    switches[0].set_speak(false);

    let outcome = manager.announce("Options", true);
    assert_eq!(outcome.backend(), Some("b"), "B re-probed opportunistically");
    assert_eq!(manager.availability("b"), Some(Availability::Available));
}

#[test]
fn unavailable_backend_not_reprobed_without_a_failure_above() {
    let log = SpeechLog::default();
    let (mut manager, switches) = manager_with(&[("a", 0), ("b", 1)], &log);
    switches[0].set_up(false);
    switches[1].set_up(false);
    manager.probe_all();
    log.clear();

    switches[1].set_up(true);
    assert_eq!(manager.announce("Hello", false), AnnounceOutcome::Dropped);
    assert_eq!(log.probes_of("b"), 0, "Waits for the next probe window");
}

// =========================================================================
// Interrupt: cancel-then-speak
// =========================================================================

#[test]
fn interrupt_cancels_before_speaking() {
    let log = SpeechLog::default();
    let (mut manager, _) = manager_with(&[("a", 0)], &log);
    manager.probe_all();
    log.clear();

    manager.announce("Menu", true);
    assert_eq!(
        log.calls(),
        vec![Call::Cancel("a".into()), Call::Speak("a".into(), "Menu".into())]
    );
}

#[test]
fn no_interrupt_does_not_cancel() {
    let log = SpeechLog::default();
    let (mut manager, _) = manager_with(&[("a", 0)], &log);
    manager.probe_all();
    log.clear();

    manager.announce("Menu", false);
    assert_eq!(log.calls(), vec![Call::Speak("a".into(), "Menu".into())]);
}

#[test]
fn interrupt_on_new_backend_cancels_previous_speaker() {
    let log = SpeechLog::default();
    let (mut manager, switches) = manager_with(&[("a", 0), ("b", 1)], &log);
    manager.probe_all();

    manager.announce("first", false);
    switches[0].set_speak(false);
    log.clear();

    manager.announce("second", true);
    let calls = log.calls();

    let cancel_a = calls.iter().position(|c| *c == Call::Cancel("a".into()));
    let speak_b = calls
        .iter()
        .position(|c| *c == Call::Speak("b".into(), "second".into()));
    assert!(cancel_a.is_some(), "Previous speaker cancelled: {:?}", calls);
    assert!(cancel_a < speak_b, "Cancel happens before the new utterance");
}

#[test]
fn silence_reaches_backends_marked_unavailable_after_speaking() {
    let log = SpeechLog::default();
    let (mut manager, switches) = manager_with(&[("a", 0), ("b", 1)], &log);
    manager.probe_all();
    manager.announce("Loading", false);

    // A drops out at the next probe while its utterance may still be playing
    switches[0].set_probe(false);
    manager.probe_all();
    assert_eq!(manager.availability("a"), Some(Availability::Unavailable));
    log.clear();

    manager.silence();
    let calls = log.calls();
    assert!(calls.contains(&Call::Cancel("a".into())), "got {:?}", calls);
    assert!(calls.contains(&Call::Cancel("b".into())), "got {:?}", calls);
}

#[test]
fn silence_skips_backends_never_probed() {
    let log = SpeechLog::default();
    let (mut manager, _) = manager_with(&[("a", 0)], &log);

    manager.silence();
    assert!(log.calls().is_empty());
}

// =========================================================================
// Status summary and screen-reader detection
// =========================================================================

#[test]
fn status_reports_active_backend_and_screen_reader() {
    let log = SpeechLog::default();
    let (manager, switches) = manager_with(&[("sr", 0), ("console", 100)], &log);
    let mut manager = manager.with_screen_reader_detector(|| true);

    assert_eq!(manager.status(), SpeechStatus::Unavailable { screen_reader: true }, "Nothing probed yet");

    manager.probe_all();
    assert_eq!(
        manager.status(),
        SpeechStatus::Active {
            backend: "sr".into(),
            screen_reader: true
        }
    );

    switches[0].set_up(false);
    manager.probe_all();
    let manager = manager.with_screen_reader_detector(|| false);
    assert_eq!(
        manager.status(),
        SpeechStatus::Active {
            backend: "console".into(),
            screen_reader: false
        }
    );
}

#[test]
fn status_without_backends_is_not_configured() {
    let manager = SpeechManager::default().with_screen_reader_detector(|| true);
    assert_eq!(manager.status(), SpeechStatus::NotConfigured);
}

#[test]
fn screen_reader_process_names_match_case_insensitively() {
    assert!(is_screen_reader_process("nvda.exe"));
    assert!(is_screen_reader_process("\"NVDA.exe\",\"4120\",\"Console\""));
    assert!(is_screen_reader_process("Narrator.exe"));
    assert!(is_screen_reader_process("orca"));
    assert!(is_screen_reader_process("VoiceOver"));
    assert!(!is_screen_reader_process("bash"));
    assert!(!is_screen_reader_process(""));
}

// =========================================================================
// Built-in backends and registry
// =========================================================================

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn console_backend_is_always_available() {
    let buffer = SharedBuffer::default();
    let mut console = ConsoleBackend::new("console", Box::new(buffer.clone()));

    assert!(console.probe());
    console.speak("Button: Exit").unwrap();
    console.cancel().unwrap();

    let written = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
    assert!(written.contains("Button: Exit"), "got {:?}", written);
}

#[test]
fn command_backend_missing_program_is_unavailable() {
    let mut backend = CommandBackend::new("tts", "definitely-not-a-speech-program-xyz", vec![]);
    assert!(!backend.probe());
    assert!(backend.speak("Hello").is_err(), "Spawn failure is reported");
    assert!(backend.cancel().is_ok(), "Nothing to cancel");
    assert!(!program_on_path("/no/such/dir/say"));
}

#[test]
fn platform_default_command_names_a_program() {
    let backend = CommandBackend::platform_default("system-tts");
    assert_eq!(backend.name(), "system-tts");
    assert!(!backend.program().is_empty());

    let mut via_env = CommandBackend::new("env", "definitely-not-a-speech-program-xyz", vec![])
        .with_text_via_env();
    assert!(via_env.speak("Hello").is_err());
}

#[test]
fn registry_builds_known_kinds_and_skips_unknown() {
    let registry = BackendRegistry::with_defaults();
    assert_eq!(registry.kinds(), vec!["command", "console", "http"]);

    let configs = vec![
        BackendConfig::new("console", "console", 100),
        BackendConfig::new("braille", "braille-display", 0),
        BackendConfig {
            endpoint: Some("http://127.0.0.1:9".into()),
            timeout_ms: 50,
            ..BackendConfig::new("bridge", "http", 1)
        },
    ];

    let manager = registry.build_manager(&configs, Duration::from_secs(10));
    let names: Vec<String> = manager.statuses().into_iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["bridge", "console"], "Unknown kind skipped, sorted by priority");
}

#[test]
fn unreachable_http_bridge_falls_back_to_console() {
    let registry = BackendRegistry::with_defaults();
    let configs = vec![
        BackendConfig {
            endpoint: Some("http://127.0.0.1:9".into()),
            timeout_ms: 50,
            ..BackendConfig::new("bridge", "http", 0)
        },
        BackendConfig::new("console", "console", 100),
    ];
    let mut manager = registry.build_manager(&configs, Duration::from_secs(10));
    manager.probe_all();

    assert_eq!(manager.availability("bridge"), Some(Availability::Unavailable));
    assert_eq!(manager.announce("Screen: Options", true).backend(), Some("console"));
}

#[test]
fn http_bridge_normalises_base_url() {
    let mut bridge =
        HttpBackend::new("bridge", "http://127.0.0.1:9/", Duration::from_millis(50)).unwrap();
    assert_eq!(bridge.base_url(), "http://127.0.0.1:9");
    assert!(!bridge.probe(), "Nothing listens on the discard port");
    assert!(bridge.speak("Hello").is_err());
}
