//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

pub mod replay;

/// Replay the revisions of a Bazaar branch that are missing from its
/// upstream onto a git repository, one commit per revision.
#[derive(Debug, Parser)]
#[command(name = "bzr2git", version, about)]
pub struct Cli {
    /// Log level.
    #[arg(
        short = 'l',
        long = "log-level",
        alias = "log_level",
        value_enum,
        ignore_case = true,
        default_value_t = LogLevel::Info
    )]
    pub log_level: LogLevel,

    /// Ask before applying each revision and pause for manual fixes.
    #[arg(short, long)]
    pub interactive: bool,

    /// Branch label used in progress messages.
    #[arg(short, long, default_value = "7.0")]
    pub branch: String,

    /// Config file [default: GIT_REPO/.git/bzr2git.toml].
    #[arg(short, long, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Bazaar branch with the revisions to replay.
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Bazaar branch the git repository was converted from.
    #[arg(value_name = "UPSTREAM")]
    pub upstream: PathBuf,

    /// Target git working tree.
    #[arg(value_name = "GIT_REPO")]
    pub git_repo: PathBuf,
}

/// Log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    #[value(alias = "warn")]
    Warning,
    Error,
    #[value(alias = "fatal")]
    Critical,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warning => Self::WARN,
            // no separate critical level
            LogLevel::Error | LogLevel::Critical => Self::ERROR,
        }
    }
}
