use clap::Parser;
use screen_narrator::cli::commands::{cmd_backends, cmd_replay, cmd_say};
use screen_narrator::cli::config::{Cli, Commands, load_config};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Replay {
            script,
            trace,
            frame_ms,
            realtime,
        } => {
            cmd_replay(&config, &script, trace.as_deref(), frame_ms, realtime)?;
        }
        Commands::Say { text, no_interrupt } => {
            if !cmd_say(&config, &text, !no_interrupt) {
                std::process::exit(1);
            }
        }
        Commands::Backends => cmd_backends(&config),
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise -v raises the level from warn.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
