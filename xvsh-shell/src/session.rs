// ---------------------------------------------------------------------------
// Front-end loops: interactive stdin and scripted playback
// ---------------------------------------------------------------------------

use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use crate::shell::Shell;

pub const BANNER: &str = "Welcome to xvsh, a shell over an XML virtual filesystem. Type 'exit' to quit.";

/// Who the prompt claims to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user: String,
    pub host: String,
}

impl Identity {
    pub fn new(user: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            host: host.into(),
        }
    }
}

/// Read commands from `input` until EOF or `exit`.
pub fn run_interactive<R: BufRead, W: Write>(
    shell: &mut Shell,
    identity: &Identity,
    mut input: R,
    mut out: W,
) -> io::Result<()> {
    writeln!(out, "{}", BANNER)?;

    let mut line = String::new();
    loop {
        write!(out, "{}", shell.prompt(&identity.user, &identity.host))?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }

        if execute(shell, line.trim_end_matches(['\r', '\n']), &mut out)? {
            break;
        }
    }
    out.flush()
}

/// Play back `script` one line at a time, echoing each command after its
/// prompt and pausing `delay` between commands.
pub fn run_script<W: Write>(
    shell: &mut Shell,
    identity: &Identity,
    script: &str,
    delay: Duration,
    mut out: W,
) -> io::Result<()> {
    for line in script.lines() {
        writeln!(
            out,
            "{}{}",
            shell.prompt(&identity.user, &identity.host),
            line
        )?;
        if execute(shell, line, &mut out)? {
            break;
        }
        out.flush()?;
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
    out.flush()
}

/// Run one line and print its output. Returns true when the shell asked to
/// stop.
fn execute<W: Write>(shell: &mut Shell, line: &str, out: &mut W) -> io::Result<bool> {
    let output = shell.run(line);
    if !output.text.is_empty() {
        writeln!(out, "{}", output.text)?;
    }
    Ok(output.exit)
}
