use std::io::Write;

use crate::error::SpeechError;
use crate::speech::backend::SpeechBackend;

/// Writes announcements as text lines. Always available, so it is the
/// last-resort fallback when no speech engine answers.
pub struct ConsoleBackend {
    name: String,
    out: Box<dyn Write>,
}

impl ConsoleBackend {
    pub fn stdout(name: &str) -> Self {
        Self::new(name, Box::new(std::io::stdout()))
    }

    pub fn new(name: &str, out: Box<dyn Write>) -> Self {
        Self {
            name: name.to_string(),
            out,
        }
    }
}

impl SpeechBackend for ConsoleBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn probe(&mut self) -> bool {
        true
    }

    fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
        writeln!(self.out, "\u{1F50A} {}", text)
            .and_then(|_| self.out.flush())
            .map_err(|e| SpeechError::Rejected {
                backend: self.name.clone(),
                reason: e.to_string(),
            })
    }

    fn cancel(&mut self) -> Result<(), SpeechError> {
        Ok(())
    }
}
