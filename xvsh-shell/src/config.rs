use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;

const HOSTNAME_FILE: &str = "/etc/hostname";
const DEFAULT_HOST: &str = "localhost";

#[derive(Parser, Debug)]
#[command(name = "xvsh", version, about = "Toy shell over an XML-backed virtual filesystem")]
pub struct CliArgs {
    /// XML document to load as the virtual filesystem
    #[arg(long, env = "XVSH_VFS")]
    pub vfs: Option<PathBuf>,

    /// Run commands from this file instead of reading stdin
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Pause between script commands, in milliseconds
    #[arg(long, default_value = "0", env = "XVSH_DELAY_MS")]
    pub delay_ms: u64,

    /// User name shown in the prompt
    #[arg(long, default_value = "user", env = "USER")]
    pub user: String,

    /// Host name shown in the prompt (defaults to the system host name)
    #[arg(long, env = "HOSTNAME")]
    pub host: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", env = "XVSH_LOG_LEVEL")]
    pub log_level: String,
}

impl CliArgs {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// `--host`, else the contents of `/etc/hostname`, else `localhost`.
    pub fn host_name(&self) -> String {
        resolve_host(self.host.as_deref(), Path::new(HOSTNAME_FILE))
    }
}

fn resolve_host(explicit: Option<&str>, hostname_file: &Path) -> String {
    if let Some(host) = explicit.filter(|host| !host.is_empty()) {
        return host.to_string();
    }
    match fs::read_to_string(hostname_file) {
        Ok(contents) if !contents.trim().is_empty() => contents.trim().to_string(),
        Ok(_) => DEFAULT_HOST.to_string(),
        Err(e) => {
            tracing::debug!(path = %hostname_file.display(), error = %e, "No host name file");
            DEFAULT_HOST.to_string()
        }
    }
}
