use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::{PublishError, Result};
use crate::git::Repository;

/// Observable state of a [MockRepository]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MockState {
    pub tool_available: bool,
    pub initialized: bool,
    pub unstaged_changes: bool,
    pub staged_changes: bool,
    pub branch: String,
    pub commits: Vec<String>,
    pub remotes: BTreeMap<String, String>,
    /// `(remote, branch, commit count)` for every successful push
    pub pushes: Vec<(String, String, usize)>,
    pub upstream: Option<(String, String)>,
    /// Exit code the next push fails with
    pub push_failure: Option<i32>,
    /// Every mutating operation, in call order
    pub mutations: Vec<String>,
}

/// Mock repository for testing without actual git operations
pub struct MockRepository {
    state: Mutex<MockState>,
}

impl MockRepository {
    /// A directory with files and no repository, on a machine with git installed
    pub fn new() -> Self {
        MockRepository {
            state: Mutex::new(MockState {
                tool_available: true,
                unstaged_changes: true,
                branch: "master".to_string(),
                ..MockState::default()
            }),
        }
    }

    /// Simulate the tool being absent from PATH
    pub fn without_tool(self) -> Self {
        self.lock().tool_available = false;
        self
    }

    /// Simulate an existing repository with a clean working copy
    pub fn initialized(self) -> Self {
        {
            let mut state = self.lock();
            state.initialized = true;
            state.unstaged_changes = false;
        }
        self
    }

    /// Simulate a pre-existing remote
    pub fn with_remote(self, name: &str, url: &str) -> Self {
        self.lock()
            .remotes
            .insert(name.to_string(), url.to_string());
        self
    }

    /// Make the next push fail with `code`
    pub fn failing_push(self, code: i32) -> Self {
        self.lock().push_failure = Some(code);
        self
    }

    /// Simulate editing a file in the working copy
    pub fn touch(&self) {
        self.lock().unstaged_changes = true;
    }

    pub fn state(&self) -> MockState {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn require_repo(state: &MockState, command: &str) -> Result<()> {
        if state.initialized {
            Ok(())
        } else {
            Err(PublishError::CommandFailed {
                command: format!("git {}", command),
                code: Some(128),
                stdout: String::new(),
                stderr: "fatal: not a git repository".to_string(),
            })
        }
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn check_tool(&self) -> Result<()> {
        if self.lock().tool_available {
            Ok(())
        } else {
            Err(PublishError::tool_missing("git"))
        }
    }

    fn is_initialized(&self) -> Result<bool> {
        Ok(self.lock().initialized)
    }

    fn init(&self) -> Result<()> {
        let mut state = self.lock();
        state.initialized = true;
        state.mutations.push("init".to_string());
        Ok(())
    }

    fn stage_all(&self) -> Result<()> {
        let mut state = self.lock();
        Self::require_repo(&state, "add -A")?;
        if state.unstaged_changes {
            state.unstaged_changes = false;
            state.staged_changes = true;
        }
        state.mutations.push("add -A".to_string());
        Ok(())
    }

    fn has_staged_changes(&self) -> Result<bool> {
        Ok(self.lock().staged_changes)
    }

    fn commit(&self, message: &str) -> Result<()> {
        let mut state = self.lock();
        Self::require_repo(&state, "commit")?;
        if !state.staged_changes {
            return Err(PublishError::CommandFailed {
                command: "git commit".to_string(),
                code: Some(1),
                stdout: "nothing to commit, working tree clean".to_string(),
                stderr: String::new(),
            });
        }
        state.staged_changes = false;
        state.commits.push(message.to_string());
        state.mutations.push(format!("commit {}", message));
        Ok(())
    }

    fn remote_url(&self, name: &str) -> Result<Option<String>> {
        Ok(self.lock().remotes.get(name).cloned())
    }

    fn remove_remote(&self, name: &str) -> Result<bool> {
        let mut state = self.lock();
        Self::require_repo(&state, "remote remove")?;
        state.mutations.push(format!("remote remove {}", name));
        Ok(state.remotes.remove(name).is_some())
    }

    fn add_remote(&self, name: &str, url: &str) -> Result<()> {
        let mut state = self.lock();
        Self::require_repo(&state, "remote add")?;
        if state.remotes.contains_key(name) {
            return Err(PublishError::CommandFailed {
                command: format!("git remote add {} {}", name, url),
                code: Some(3),
                stdout: String::new(),
                stderr: format!("error: remote {} already exists.", name),
            });
        }
        state.remotes.insert(name.to_string(), url.to_string());
        state.mutations.push(format!("remote add {} {}", name, url));
        Ok(())
    }

    fn force_branch(&self, branch: &str) -> Result<()> {
        let mut state = self.lock();
        Self::require_repo(&state, "branch -M")?;
        state.branch = branch.to_string();
        state.mutations.push(format!("branch -M {}", branch));
        Ok(())
    }

    fn push_upstream(&self, remote: &str, branch: &str) -> Result<()> {
        let mut state = self.lock();
        Self::require_repo(&state, "push")?;
        if let Some(code) = state.push_failure.take() {
            return Err(PublishError::CommandFailed {
                command: format!("git push -u {} {}", remote, branch),
                code: Some(code),
                stdout: String::new(),
                stderr: String::new(),
            });
        }
        if !state.remotes.contains_key(remote) {
            return Err(PublishError::CommandFailed {
                command: format!("git push -u {} {}", remote, branch),
                code: Some(128),
                stdout: String::new(),
                stderr: format!("fatal: '{}' does not appear to be a git repository", remote),
            });
        }
        let count = state.commits.len();
        state
            .pushes
            .push((remote.to_string(), branch.to_string(), count));
        state.upstream = Some((remote.to_string(), branch.to_string()));
        state.mutations.push(format!("push -u {} {}", remote, branch));
        Ok(())
    }
}
