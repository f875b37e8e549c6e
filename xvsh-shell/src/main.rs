use std::fs;
use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use xvsh_shell::config::CliArgs;
use xvsh_shell::session::{self, Identity};
use xvsh_shell::Shell;

fn main() -> Result<()> {
    let args = CliArgs::parse();

    // Logs go to stderr; stdout carries the shell transcript
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
        )
        .init();

    let mut shell = match &args.vfs {
        Some(path) => match Shell::open(path) {
            Ok(shell) => shell,
            Err(e) => {
                eprintln!("xvsh: could not load {}: {}", path.display(), e);
                tracing::warn!(code = e.code(), "Continuing without a virtual filesystem");
                Shell::new()
            }
        },
        None => Shell::new(),
    };

    let identity = Identity::new(args.user.clone(), args.host_name());
    let stdout = io::stdout().lock();

    match &args.script {
        Some(script) => {
            let commands = fs::read_to_string(script)
                .with_context(|| format!("reading script {}", script.display()))?;
            tracing::info!(script = %script.display(), "Running script");
            session::run_script(&mut shell, &identity, &commands, args.delay(), stdout)?;
        }
        None => {
            session::run_interactive(&mut shell, &identity, io::stdin().lock(), stdout)?;
        }
    }
    Ok(())
}
