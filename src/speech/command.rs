use std::path::Path;
use std::process::{Child, Command, Stdio};

use tracing::debug;

use crate::error::SpeechError;
use crate::speech::backend::SpeechBackend;

/// Environment variable carrying the text when `text_via_env` is set.
pub const TEXT_ENV_VAR: &str = "SCREEN_NARRATOR_TEXT";

/// OS text-to-speech through an external program (`spd-say`, `say`, ...).
///
/// Each utterance is a fire-and-forget child process. Cancelling kills any
/// child still running and, when configured, runs the program's own cancel
/// command (speech-dispatcher keeps speaking after its client exits).
pub struct CommandBackend {
    name: String,
    program: String,
    args: Vec<String>,
    cancel_args: Option<Vec<String>>,
    /// Pass text through `TEXT_ENV_VAR` instead of as the last argument
    text_via_env: bool,
    children: Vec<Child>,
}

impl CommandBackend {
    pub fn new(name: &str, program: &str, args: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            program: program.to_string(),
            args,
            cancel_args: None,
            text_via_env: false,
            children: vec![],
        }
    }

    pub fn with_cancel_args(mut self, args: Vec<String>) -> Self {
        self.cancel_args = Some(args);
        self
    }

    pub fn with_text_via_env(mut self) -> Self {
        self.text_via_env = true;
        self
    }

    /// The stock speech program of the current platform.
    pub fn platform_default(name: &str) -> Self {
        if cfg!(target_os = "macos") {
            Self::new(name, "say", vec![])
        } else if cfg!(target_os = "windows") {
            Self::new(
                name,
                "powershell",
                vec![
                    "-NoProfile".into(),
                    "-Command".into(),
                    format!(
                        "Add-Type -AssemblyName System.Speech; \
                         (New-Object System.Speech.Synthesis.SpeechSynthesizer).Speak($env:{})",
                        TEXT_ENV_VAR
                    ),
                ],
            )
            .with_text_via_env()
        } else {
            Self::new(name, "spd-say", vec![]).with_cancel_args(vec!["--cancel".into()])
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Drop handles of children that already exited.
    fn reap(&mut self) {
        self.children
            .retain_mut(|child| matches!(child.try_wait(), Ok(None)));
    }
}

impl SpeechBackend for CommandBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn probe(&mut self) -> bool {
        program_on_path(&self.program)
    }

    fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
        self.reap();

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        if self.text_via_env {
            command.env(TEXT_ENV_VAR, text);
        } else {
            command.arg(text);
        }

        let child = command.spawn().map_err(|e| SpeechError::Spawn {
            program: self.program.clone(),
            source: e,
        })?;

        self.children.push(child);
        Ok(())
    }

    fn cancel(&mut self) -> Result<(), SpeechError> {
        for mut child in self.children.drain(..) {
            // Already exited is fine
            if let Err(e) = child.kill() {
                debug!(program = %self.program, error = %e, "kill skipped");
            }
            let _ = child.wait();
        }

        if let Some(args) = &self.cancel_args {
            let status = Command::new(&self.program)
                .args(args)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .map_err(|e| SpeechError::Spawn {
                    program: self.program.clone(),
                    source: e,
                })?;

            if !status.success() {
                return Err(SpeechError::Rejected {
                    backend: self.name.clone(),
                    reason: format!("cancel exited with {}", status),
                });
            }
        }

        Ok(())
    }
}

/// Whether `program` is an existing path or resolvable through `PATH`.
pub fn program_on_path(program: &str) -> bool {
    let direct = Path::new(program);
    if direct.components().count() > 1 {
        return direct.is_file();
    }

    let Some(paths) = std::env::var_os("PATH") else {
        return false;
    };

    std::env::split_paths(&paths).any(|dir| {
        let candidate = dir.join(program);
        candidate.is_file() || (cfg!(windows) && candidate.with_extension("exe").is_file())
    })
}
