//! Command shell over an [`xvsh_vfs::Vfs`].
//!
//! [`Shell`] turns one command line into display text; [`session`] drives it
//! from a terminal or a script.

pub mod command;
pub mod config;
pub mod session;
pub mod shell;

pub use command::Command;
pub use shell::{CommandOutput, Shell};
