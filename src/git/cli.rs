use crate::error::{PublishError, Result};
use crate::git::command::{self, PublishContext};
use crate::git::Repository;

/// Name of the repository metadata directory inside the working copy.
pub const METADATA_DIR: &str = ".git";

/// [Repository] backed by the `git` executable.
///
/// Each operation runs exactly one command in the context's working
/// directory. The push runs attached to the terminal so that credential
/// prompts and the tool's own errors reach the operator unchanged.
pub struct GitCli {
    ctx: PublishContext,
}

impl GitCli {
    pub fn new(ctx: PublishContext) -> Self {
        GitCli { ctx }
    }

    fn git(&self, args: &[&str]) -> Result<command::CommandOutput> {
        command::run(&self.ctx, args)
    }
}

/// Whether `git status --porcelain` output lists any index change.
///
/// The first status column describes the index; untracked (`?`) and
/// ignored (`!`) entries do not count.
pub fn porcelain_has_staged(porcelain: &str) -> bool {
    porcelain
        .lines()
        .filter_map(|line| line.chars().next())
        .any(|index| !matches!(index, ' ' | '?' | '!'))
}

impl Repository for GitCli {
    fn check_tool(&self) -> Result<()> {
        which::which(&self.ctx.program)
            .map(|_| ())
            .map_err(|_| PublishError::tool_missing(&self.ctx.program))
    }

    fn is_initialized(&self) -> Result<bool> {
        Ok(self.ctx.work_dir().join(METADATA_DIR).exists())
    }

    fn init(&self) -> Result<()> {
        self.git(&["init"])?;
        Ok(())
    }

    fn stage_all(&self) -> Result<()> {
        self.git(&["add", "-A"])?;
        Ok(())
    }

    fn has_staged_changes(&self) -> Result<bool> {
        let output = self.git(&["status", "--porcelain"])?;
        Ok(porcelain_has_staged(&output.stdout))
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.git(&["commit", "-m", message])?;
        Ok(())
    }

    fn remote_url(&self, name: &str) -> Result<Option<String>> {
        match self.git(&["remote", "get-url", name]) {
            Ok(output) => Ok(Some(output.stdout.trim().to_string())),
            Err(PublishError::CommandFailed { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn remove_remote(&self, name: &str) -> Result<bool> {
        match self.git(&["remote", "remove", name]) {
            Ok(_) => Ok(true),
            Err(PublishError::CommandFailed { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn add_remote(&self, name: &str, url: &str) -> Result<()> {
        self.git(&["remote", "add", name, url])?;
        Ok(())
    }

    fn force_branch(&self, branch: &str) -> Result<()> {
        self.git(&["branch", "-M", branch])?;
        Ok(())
    }

    fn push_upstream(&self, remote: &str, branch: &str) -> Result<()> {
        command::run_inherited(&self.ctx, &["push", "-u", remote, branch])?;
        Ok(())
    }
}
