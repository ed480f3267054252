//! Version-control operations abstraction layer
//!
//! The publish workflow talks to the working copy only through the
//! [Repository] trait. Implementations:
//!
//! - [cli::GitCli]: drives the `git` executable, one command per operation
//! - [mock::MockRepository]: in-memory state for testing
//!
//! [snapshot::RepositorySnapshot] reads the resulting state through `git2`
//! without invoking any tool.

pub mod cli;
pub mod command;
pub mod mock;
pub mod snapshot;

pub use cli::GitCli;
pub use command::{CommandOutput, PublishContext};
pub use mock::MockRepository;
pub use snapshot::RepositorySnapshot;

use crate::error::Result;

/// Operations the publish workflow performs on a working copy
///
/// Every mutating operation is expected to be idempotent or to fail; callers
/// never inspect a failure beyond propagating it.
pub trait Repository: Send + Sync {
    /// Verify the version-control tool can be resolved.
    ///
    /// # Returns
    /// * `Ok(())` - The tool is available
    /// * `Err(ToolMissing)` - It is not; nothing else should run
    fn check_tool(&self) -> Result<()>;

    /// Whether the repository metadata directory exists.
    fn is_initialized(&self) -> Result<bool>;

    /// Create an empty repository in the working copy.
    fn init(&self) -> Result<()>;

    /// Stage every working-copy file, including deletions.
    fn stage_all(&self) -> Result<()>;

    /// Whether the index holds changes not yet committed.
    fn has_staged_changes(&self) -> Result<bool>;

    /// Commit the index with `message`.
    fn commit(&self, message: &str) -> Result<()>;

    /// URL of the remote `name`, or `None` if no such remote exists.
    fn remote_url(&self, name: &str) -> Result<Option<String>>;

    /// Remove the remote `name`.
    ///
    /// # Returns
    /// * `Ok(true)` - A remote was removed
    /// * `Ok(false)` - The tool refused; usually because there was none
    fn remove_remote(&self, name: &str) -> Result<bool>;

    /// Add the remote `name` pointing at `url`.
    fn add_remote(&self, name: &str, url: &str) -> Result<()>;

    /// Force-rename the current branch to `branch`.
    fn force_branch(&self, branch: &str) -> Result<()>;

    /// Push `branch` to `remote` and record it as the upstream.
    fn push_upstream(&self, remote: &str, branch: &str) -> Result<()>;
}
