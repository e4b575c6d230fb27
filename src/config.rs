//! Run configuration resolved once from the CLI and the environment.
//!
//! Precedence, highest first:
//! 1. CLI flags
//! 2. `$FEED_LLM_STATE_DIR` (where saved selections live)
//! 3. `<root>/.feed-llm-ignore`
//! 4. Built-in defaults

use crate::cli::{Cli, OutputFormat};
use crate::ignore_rules::IgnorePredicate;
use crate::session_store::JsonFileStore;
use anyhow::{Context, Result, bail};
use std::ffi::OsString;
use std::path::PathBuf;

pub const STATE_DIR_ENV: &str = "FEED_LLM_STATE_DIR";

#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Canonical absolute root.
    pub root: PathBuf,
    pub ignore: IgnorePredicate,
    pub state_dir: Option<PathBuf>,
    pub format: OutputFormat,
    pub to_stdout: bool,
}

impl RunConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        Self::resolve(cli, std::env::var_os(STATE_DIR_ENV))
    }

    fn resolve(cli: &Cli, state_dir_env: Option<OsString>) -> Result<Self> {
        let root = cli
            .directory
            .canonicalize()
            .with_context(|| format!("cannot resolve directory {}", cli.directory.display()))?;
        if !root.is_dir() {
            bail!("{} is not a directory", root.display());
        }

        let state_dir = state_dir_env
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(JsonFileStore::default_state_dir);

        Ok(Self {
            ignore: IgnorePredicate::load(&root, cli.no_ignore),
            root,
            state_dir,
            format: cli.format,
            to_stdout: cli.stdout,
        })
    }
}
