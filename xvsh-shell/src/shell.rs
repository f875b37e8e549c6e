// ---------------------------------------------------------------------------
// Shell: one command line in, display text out
// ---------------------------------------------------------------------------

use std::path::Path;

use xvsh_vfs::path::ROOT_PATH;
use xvsh_vfs::{Vfs, VfsError};

use crate::command::Command;

const NO_VFS: &str = "no virtual filesystem loaded";

/// Result of running one command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Text to display; empty when the command prints nothing.
    pub text: String,
    /// The front-end should stop reading commands.
    pub exit: bool,
}

impl CommandOutput {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            exit: false,
        }
    }
}

/// Command dispatcher over an optional VFS.
///
/// Without a VFS, `ls` and `cd` only echo their arguments.
#[derive(Debug, Default)]
pub struct Shell {
    vfs: Option<Vfs>,
}

impl Shell {
    /// A shell with no filesystem behind it.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vfs(vfs: Vfs) -> Self {
        Self { vfs: Some(vfs) }
    }

    /// Load the XML document at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, VfsError> {
        Ok(Self::with_vfs(Vfs::load(path)?))
    }

    pub fn vfs(&self) -> Option<&Vfs> {
        self.vfs.as_ref()
    }

    /// Cursor of the loaded VFS, `/` when there is none.
    pub fn cwd(&self) -> &str {
        self.vfs.as_ref().map_or(ROOT_PATH, Vfs::current_path)
    }

    /// `[user@host]:cwd$ `
    pub fn prompt(&self, user: &str, host: &str) -> String {
        format!("[{}@{}]:{}$ ", user, host, self.cwd())
    }

    /// Run one command line. Errors are reported in the output text.
    pub fn run(&mut self, line: &str) -> CommandOutput {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(err) => {
                let verb = line.split_whitespace().next().unwrap_or_default();
                tracing::warn!(verb, error = %err, "Rejected command line");
                return CommandOutput::text(format!("{}: {}", verb, err));
            }
        };

        tracing::debug!(verb = command.verb(), "Running command");
        let verb = command.verb().to_string();
        match self.execute(command) {
            Ok(output) => output,
            Err(err) => {
                tracing::warn!(verb = %verb, error = %err, "Command failed");
                CommandOutput::text(describe_error(&verb, &err))
            }
        }
    }

    fn execute(&mut self, command: Command) -> Result<CommandOutput, VfsError> {
        let text = match command {
            Command::Empty => String::new(),
            Command::Exit => {
                return Ok(CommandOutput {
                    text: "Exiting...".to_string(),
                    exit: true,
                });
            }
            Command::Echo { words } => words.join(" "),
            Command::Unknown { verb } => format!("Unknown command: {}", verb),
            Command::Ls { args } => self.ls(args)?,
            Command::Cd { path } => self.cd(path)?,
            Command::Save { path } => self.save(path)?,
            Command::Rev { path } => {
                let path = require_operand(path)?;
                let content = self.vfs_mut()?.read_file(&path)?;
                content.lines().rev().collect::<Vec<_>>().join("\n")
            }
            Command::Head { lines, path } => {
                let path = require_operand(path)?;
                let content = self.vfs_mut()?.read_file(&path)?;
                content.lines().take(lines).collect::<Vec<_>>().join("\n")
            }
        };
        Ok(CommandOutput::text(text))
    }

    fn ls(&mut self, args: Vec<String>) -> Result<String, VfsError> {
        let Some(vfs) = self.vfs.as_mut() else {
            return Ok(format!("ls: called with arguments: [{}]", args.join(", ")));
        };
        let entries = vfs.list_directory(args.first().map(String::as_str))?;
        Ok(entries
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn cd(&mut self, path: Option<String>) -> Result<String, VfsError> {
        let path = require_operand(path)?;
        let Some(vfs) = self.vfs.as_mut() else {
            return Ok(format!("cd: would change directory to {}", path));
        };
        vfs.cd(&path)?;
        Ok(format!("Changed directory to {}", vfs.current_path()))
    }

    fn save(&mut self, path: Option<String>) -> Result<String, VfsError> {
        let vfs = self.vfs_mut()?;
        let target = match path {
            Some(path) => {
                vfs.save(&path)?;
                path
            }
            None => vfs.save_to_source()?.display().to_string(),
        };
        Ok(format!("VFS saved to {}", target))
    }

    fn vfs_mut(&mut self) -> Result<&mut Vfs, VfsError> {
        self.vfs
            .as_mut()
            .ok_or_else(|| VfsError::NotFound(NO_VFS.to_string()))
    }
}

fn require_operand(operand: Option<String>) -> Result<String, VfsError> {
    operand.ok_or_else(|| VfsError::InvalidArgument("missing operand".to_string()))
}

fn describe_error(verb: &str, err: &VfsError) -> String {
    match err.missing_path() {
        Some(NO_VFS) => format!("{}: {}", verb, NO_VFS),
        Some(path) if verb == "cd" => format!("cd: directory not found: {}", path),
        Some(path) => format!("{}: {}: no such file or directory", verb, path),
        None => format!("{}: {}", verb, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xvsh_vfs::{Directory, File};

    fn docs_shell() -> Shell {
        let mut docs = Directory::new("docs", "755");
        docs.attach(File::new("a.txt", "644", "hello\nworld")).unwrap();
        let mut root = Directory::new_root();
        root.attach(docs).unwrap();
        Shell::with_vfs(Vfs::with_root(root))
    }

    fn text(shell: &mut Shell, line: &str) -> String {
        shell.run(line).text
    }

    #[test]
    fn docs_scenario() {
        let mut shell = docs_shell();
        assert_eq!(text(&mut shell, "ls"), "d755 docs");
        assert_eq!(text(&mut shell, "cd docs"), "Changed directory to /docs");
        assert_eq!(shell.prompt("ada", "box"), "[ada@box]:/docs$ ");
        assert_eq!(text(&mut shell, "ls"), "-644 a.txt");
        assert_eq!(text(&mut shell, "head -n 1 a.txt"), "hello");
        assert_eq!(text(&mut shell, "rev a.txt"), "world\nhello");
    }

    #[test]
    fn cd_failure_message() {
        let mut shell = docs_shell();
        assert_eq!(text(&mut shell, "cd nope"), "cd: directory not found: nope");
        assert_eq!(
            text(&mut shell, "cd docs/a.txt"),
            "cd: directory not found: docs/a.txt"
        );
        assert_eq!(shell.cwd(), "/");
    }

    #[test]
    fn missing_operands() {
        let mut shell = docs_shell();
        assert_eq!(
            text(&mut shell, "cd"),
            "cd: Invalid argument: missing operand"
        );
        assert_eq!(
            text(&mut shell, "rev"),
            "rev: Invalid argument: missing operand"
        );
        assert_eq!(
            text(&mut shell, "head -n x a.txt"),
            "head: Invalid argument: invalid number of lines: x"
        );
    }

    #[test]
    fn file_errors() {
        let mut shell = docs_shell();
        assert_eq!(
            text(&mut shell, "rev docs"),
            "rev: docs: no such file or directory"
        );
        assert_eq!(
            text(&mut shell, "ls docs/a.txt"),
            "ls: docs/a.txt: no such file or directory"
        );
    }

    #[test]
    fn ls_with_path() {
        let mut shell = docs_shell();
        assert_eq!(text(&mut shell, "ls /docs"), "-644 a.txt");
        assert_eq!(shell.cwd(), "/");
    }

    #[test]
    fn head_and_rev_line_handling() {
        let mut root = Directory::new_root();
        let numbered: String = (1..=12).map(|i| format!("line{}\n", i)).collect();
        root.attach(File::with_content("n.txt", numbered)).unwrap();
        let mut shell = Shell::with_vfs(Vfs::with_root(root));

        let head = text(&mut shell, "head n.txt");
        assert_eq!(head.lines().count(), 10);
        assert!(head.ends_with("line10"));
        assert_eq!(text(&mut shell, "head -n 0 n.txt"), "");
        assert!(text(&mut shell, "rev n.txt").starts_with("line12\nline11"));
    }

    #[test]
    fn head_reads_file_named_like_an_option() {
        let mut root = Directory::new_root();
        root.attach(File::with_content("-notes", "one\ntwo")).unwrap();
        let mut shell = Shell::with_vfs(Vfs::with_root(root));
        assert_eq!(text(&mut shell, "head -notes"), "one\ntwo");
        assert_eq!(text(&mut shell, "head -n1 -notes"), "one");
    }

    #[test]
    fn echo_and_unknown() {
        let mut shell = Shell::new();
        assert_eq!(text(&mut shell, "echo  hi   there"), "hi there");
        assert_eq!(text(&mut shell, "frobnicate x"), "Unknown command: frobnicate");
        assert_eq!(text(&mut shell, ""), "");
    }

    #[test]
    fn exit_signals_termination() {
        let out = Shell::new().run("exit");
        assert!(out.exit);
        assert_eq!(out.text, "Exiting...");
    }

    #[test]
    fn placeholders_without_vfs() {
        let mut shell = Shell::new();
        assert_eq!(
            text(&mut shell, "ls -l /tmp"),
            "ls: called with arguments: [-l, /tmp]"
        );
        assert_eq!(text(&mut shell, "ls"), "ls: called with arguments: []");
        assert_eq!(
            text(&mut shell, "cd /home"),
            "cd: would change directory to /home"
        );
        assert_eq!(
            text(&mut shell, "rev a.txt"),
            "rev: no virtual filesystem loaded"
        );
        assert_eq!(
            text(&mut shell, "vfs-save"),
            "vfs-save: no virtual filesystem loaded"
        );
        assert_eq!(shell.cwd(), "/");
    }

    #[test]
    fn save_without_source_needs_path() {
        let mut shell = docs_shell();
        assert_eq!(
            text(&mut shell, "vfs-save"),
            "vfs-save: Invalid argument: No save path given and VFS was not loaded from a file"
        );
    }
}
