use std::process::{Command, Stdio};

use tracing::debug;

/// Process names of assistive technology that reads the screen aloud,
/// matched as lowercase substrings.
pub const SCREEN_READER_PROCESSES: &[&str] = &[
    "nvda", "jaws", "narrator", "windoweyes", "zoomtext",
    "orca", "voiceover",
];

pub fn is_screen_reader_process(name: &str) -> bool {
    let lower = name.to_lowercase();
    SCREEN_READER_PROCESSES.iter().any(|sr| lower.contains(sr))
}

/// Whether a known screen reader is running. A process list that cannot be
/// read counts as "none running".
pub fn screen_reader_running() -> bool {
    match running_process_names() {
        Ok(names) => names.iter().any(|n| is_screen_reader_process(n)),
        Err(e) => {
            debug!(error = %e, "could not list processes");
            false
        }
    }
}

fn running_process_names() -> std::io::Result<Vec<String>> {
    let mut command = if cfg!(target_os = "windows") {
        let mut c = Command::new("tasklist");
        c.args(["/fo", "csv", "/nh"]);
        c
    } else {
        let mut c = Command::new("ps");
        c.args(["-A", "-o", "comm="]);
        c
    };

    let output = command
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()?;

    Ok(String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|l| l.trim().trim_matches('"').to_string())
        .filter(|l| !l.is_empty())
        .collect())
}
