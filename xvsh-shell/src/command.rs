use xvsh_vfs::VfsError;

pub const DEFAULT_HEAD_LINES: usize = 10;

/// One parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Blank line.
    Empty,
    Ls { args: Vec<String> },
    Cd { path: Option<String> },
    Echo { words: Vec<String> },
    Save { path: Option<String> },
    Rev { path: Option<String> },
    Head { lines: usize, path: Option<String> },
    Exit,
    Unknown { verb: String },
}

impl Command {
    /// Split `line` on whitespace and recognise the verb.
    pub fn parse(line: &str) -> Result<Self, VfsError> {
        let mut words = line.split_whitespace().map(str::to_string);
        let Some(verb) = words.next() else {
            return Ok(Self::Empty);
        };
        let args: Vec<String> = words.collect();

        let command = match verb.as_str() {
            "ls" => Self::Ls { args },
            "cd" => Self::Cd {
                path: args.into_iter().next(),
            },
            "echo" => Self::Echo { words: args },
            "vfs-save" => Self::Save {
                path: args.into_iter().next(),
            },
            "rev" => Self::Rev {
                path: args.into_iter().next(),
            },
            "head" => parse_head(args)?,
            "exit" => Self::Exit,
            _ => Self::Unknown { verb },
        };
        Ok(command)
    }

    pub fn verb(&self) -> &str {
        match self {
            Self::Empty => "",
            Self::Ls { .. } => "ls",
            Self::Cd { .. } => "cd",
            Self::Echo { .. } => "echo",
            Self::Save { .. } => "vfs-save",
            Self::Rev { .. } => "rev",
            Self::Head { .. } => "head",
            Self::Exit => "exit",
            Self::Unknown { verb } => verb,
        }
    }
}

/// `head [-n N] <path>`; also accepts `-nN`. A word such as `-notes` is a
/// path, not a count.
fn parse_head(args: Vec<String>) -> Result<Command, VfsError> {
    let mut lines = DEFAULT_HEAD_LINES;
    let mut path = None;
    let mut iter = args.into_iter();

    while let Some(arg) = iter.next() {
        if arg == "-n" {
            let count = iter
                .next()
                .ok_or_else(|| VfsError::InvalidArgument("option -n requires a number".to_string()))?;
            lines = parse_count(&count)?;
        } else if let Some(count) = joined_count(&arg) {
            lines = parse_count(count)?;
        } else if path.is_none() {
            path = Some(arg);
        }
    }

    Ok(Command::Head { lines, path })
}

fn joined_count(arg: &str) -> Option<&str> {
    arg.strip_prefix("-n")
        .filter(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

fn parse_count(raw: &str) -> Result<usize, VfsError> {
    raw.parse::<usize>()
        .map_err(|_| VfsError::InvalidArgument(format!("invalid number of lines: {}", raw)))
}
