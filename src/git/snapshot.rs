use std::collections::BTreeMap;
use std::path::Path;

use git2::{BranchType, ErrorCode, Repository as Git2Repo};

use crate::error::Result;

/// Read-only view of a repository's publish-relevant state.
///
/// Captured through `git2`, so it works without the `git` executable and
/// never changes anything on disk.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RepositorySnapshot {
    /// Branch HEAD points at, including an unborn one. `None` when detached.
    pub branch: Option<String>,
    /// Summary line of the HEAD commit. `None` before the first commit.
    pub head_summary: Option<String>,
    pub head_oid: Option<String>,
    /// Local branch name to the summary of its tip commit
    pub branches: BTreeMap<String, String>,
    /// Remote name to URL
    pub remotes: BTreeMap<String, String>,
    /// Upstream of the current branch, e.g. `origin/main`
    pub upstream: Option<String>,
}

impl RepositorySnapshot {
    /// Captures the repository at `dir`.
    ///
    /// # Returns
    /// * `Ok(Some(snapshot))` - `dir` holds a repository (bare or not)
    /// * `Ok(None)` - `dir` is not a repository
    /// * `Err` - The repository exists but could not be read
    pub fn capture<P: AsRef<Path>>(dir: P) -> Result<Option<Self>> {
        let repo = match Git2Repo::open(dir.as_ref()) {
            Ok(repo) => repo,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Self::from_git2(&repo).map(Some)
    }

    /// Captures an already opened repository.
    pub fn from_git2(repo: &Git2Repo) -> Result<Self> {
        let head = repo.find_reference("HEAD")?;
        let branch = head
            .symbolic_target()
            .map(|target| target.trim_start_matches("refs/heads/").to_string());

        let head_commit = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let head_summary = head_commit
            .as_ref()
            .map(|c| c.summary().unwrap_or_default().to_string());
        let head_oid = head_commit.as_ref().map(|c| c.id().to_string());

        let mut branches = BTreeMap::new();
        for entry in repo.branches(Some(BranchType::Local))? {
            let (local, _) = entry?;
            let Some(name) = local.name()?.map(str::to_string) else {
                continue;
            };
            let summary = local
                .get()
                .peel_to_commit()
                .ok()
                .and_then(|c| c.summary().map(str::to_string))
                .unwrap_or_default();
            branches.insert(name, summary);
        }

        let mut remotes = BTreeMap::new();
        for name in repo.remotes()?.iter().flatten() {
            let remote = repo.find_remote(name)?;
            remotes.insert(name.to_string(), remote.url().unwrap_or_default().to_string());
        }

        let upstream = branch.as_deref().and_then(|name| {
            let local = repo.find_branch(name, BranchType::Local).ok()?;
            let upstream = local.upstream().ok()?;
            let upstream_name = upstream.name().ok()??.to_string();
            Some(upstream_name)
        });

        Ok(RepositorySnapshot {
            branch,
            head_summary,
            head_oid,
            branches,
            remotes,
            upstream,
        })
    }

    /// URL of remote `name`, if configured
    pub fn remote_url(&self, name: &str) -> Option<&str> {
        self.remotes.get(name).map(String::as_str)
    }
}
