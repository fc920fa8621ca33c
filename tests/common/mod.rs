#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use screen_narrator::error::SpeechError;
use screen_narrator::host::widget::{Control, WidgetNode};
use screen_narrator::speech::backend::SpeechBackend;
use screen_narrator::speech::manager::SpeechManager;

// =========================================================================
// Recording speech backend
// =========================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Probe(String),
    Speak(String, String),
    Cancel(String),
}

/// Shared call log across every recording backend of a test.
#[derive(Clone, Default)]
pub struct SpeechLog(Rc<RefCell<Vec<Call>>>);

impl SpeechLog {
    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    /// Texts accepted for speech, in order, by any backend.
    pub fn spoken(&self) -> Vec<String> {
        self.0
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Speak(_, text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn spoken_by(&self, backend: &str) -> Vec<String> {
        self.0
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Speak(name, text) if name == backend => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn probes_of(&self, backend: &str) -> usize {
        self.0
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::Probe(name) if name == backend))
            .count()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    fn push(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }
}

/// Flips a recording backend's probe and speak results from the test.
#[derive(Clone)]
pub struct BackendSwitch {
    probe_ok: Rc<Cell<bool>>,
    speak_ok: Rc<Cell<bool>>,
}

impl BackendSwitch {
    pub fn set_probe(&self, ok: bool) {
        self.probe_ok.set(ok);
    }

    pub fn set_speak(&self, ok: bool) {
        self.speak_ok.set(ok);
    }

    /// Probe and speak both succeed (or both fail).
    pub fn set_up(&self, up: bool) {
        self.set_probe(up);
        self.set_speak(up);
    }
}

pub struct RecordingBackend {
    name: String,
    log: SpeechLog,
    probe_ok: Rc<Cell<bool>>,
    speak_ok: Rc<Cell<bool>>,
}

impl SpeechBackend for RecordingBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn probe(&mut self) -> bool {
        self.log.push(Call::Probe(self.name.clone()));
        self.probe_ok.get()
    }

    fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
        if !self.speak_ok.get() {
            return Err(SpeechError::Rejected {
                backend: self.name.clone(),
                reason: "switched off".into(),
            });
        }
        self.log.push(Call::Speak(self.name.clone(), text.to_string()));
        Ok(())
    }

    fn cancel(&mut self) -> Result<(), SpeechError> {
        self.log.push(Call::Cancel(self.name.clone()));
        Ok(())
    }
}

pub fn recording(name: &str, log: &SpeechLog) -> (Box<dyn SpeechBackend>, BackendSwitch) {
    let switch = BackendSwitch {
        probe_ok: Rc::new(Cell::new(true)),
        speak_ok: Rc::new(Cell::new(true)),
    };
    let backend = RecordingBackend {
        name: name.to_string(),
        log: log.clone(),
        probe_ok: switch.probe_ok.clone(),
        speak_ok: switch.speak_ok.clone(),
    };
    (Box::new(backend), switch)
}

/// Manager with one recording backend per `(name, priority)`, all up.
pub fn manager_with(backends: &[(&str, u32)], log: &SpeechLog) -> (SpeechManager, Vec<BackendSwitch>) {
    let mut manager =
        SpeechManager::new(Duration::from_secs(10)).with_screen_reader_detector(|| false);
    let mut switches = vec![];
    for (name, priority) in backends {
        let (backend, switch) = recording(name, log);
        manager.register(backend, *priority);
        switches.push(switch);
    }
    (manager, switches)
}

// =========================================================================
// Widget builders
// =========================================================================

pub fn button(label: &str) -> WidgetNode {
    WidgetNode::named(&format!("{}Button", label.replace(' ', ""))).with_control(Control::Button).with_child_text(label)
}

pub fn toggle(label: &str, is_on: bool) -> WidgetNode {
    WidgetNode::named(&format!("{}Toggle", label)).with_control(Control::Toggle { is_on }).with_child_text(label)
}

pub fn ms(base: Instant, millis: u64) -> Instant {
    base + Duration::from_millis(millis)
}
