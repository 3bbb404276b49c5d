//! Replay missing source revisions onto the target git repository.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use bzr2git_bzr::BzrBranch;
use bzr2git_core::config::CONFIG_FILE;
use bzr2git_core::{Config, ProjectDescriptor, ReplayEngine, ReplayOptions};
use bzr2git_git::Repository;

use super::Cli;
use crate::operator::TerminalOperator;
use crate::output;

/// Absolute form of a directory argument.
fn directory(path: &Path) -> Result<PathBuf> {
    if !path.is_dir() {
        bail!("{} is not a directory", path.display());
    }
    std::path::absolute(path).with_context(|| format!("cannot resolve {}", path.display()))
}

/// Run the replay.
pub fn run(cli: &Cli) -> Result<()> {
    let source_dir = directory(&cli.source)?;
    let upstream_dir = directory(&cli.upstream)?;
    let git_dir = directory(&cli.git_repo)?;

    let repo = Repository::open(&git_dir)
        .with_context(|| format!("{} is not a git repository", git_dir.display()))?;

    // only the implicit location may be absent
    let config_path = match &cli.config {
        Some(path) if !path.is_file() => bail!("config file {} not found", path.display()),
        Some(path) => path.clone(),
        None => repo.git_dir().join(CONFIG_FILE),
    };
    let config = Config::load(&config_path)?;
    tracing::debug!(config = %config_path.display(), "configuration loaded");

    let repo = repo.with_tools(config.tools.git_tools());
    if !repo.is_clean()? {
        bail!(
            "{} has uncommitted changes - commit or stash them first",
            git_dir.display()
        );
    }

    let upstream = BzrBranch::open(&upstream_dir)
        .with_context(|| format!("cannot open upstream branch {}", upstream_dir.display()))?
        .with_program(&config.tools.bzr);
    let source = BzrBranch::open_containing(&source_dir)
        .with_context(|| format!("cannot open source branch {}", source_dir.display()))?
        .with_program(&config.tools.bzr);

    let project = ProjectDescriptor::detect(&source_dir)?;
    tracing::debug!(project = %project.kind, "detected project");

    output::info(&format!(
        "Replaying {} onto {}",
        source_dir.display(),
        git_dir.display()
    ));

    let options = ReplayOptions {
        branch: cli.branch.clone(),
        interactive: cli.interactive,
    };
    let engine = ReplayEngine::new(
        &upstream,
        &source,
        &repo,
        &TerminalOperator,
        &project,
        &config,
        options,
    );

    let summary = engine.run()?;
    output::print_summary(&summary);
    Ok(())
}
