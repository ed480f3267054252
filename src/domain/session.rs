use crate::config::{PublishConfig, DEFAULT_BRANCH, DEFAULT_COMMIT_MESSAGE, DEFAULT_REMOTE};
use crate::domain::RemoteUrl;
use crate::error::Result;

/// Which variant of the workflow to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishMode {
    /// Commit locally, then print the commands to finish by hand
    Deploy,
    /// Commit, configure the remote and push. Holds the raw operator input.
    Push { remote_url: String },
}

/// One publish run's inputs, discarded at exit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishSession {
    pub mode: PublishMode,
    pub remote: String,
    pub branch: String,
    pub commit_message: String,
}

impl PublishSession {
    /// Session for the push variant with the default remote, branch and message.
    pub fn push(remote_url: impl Into<String>) -> Self {
        PublishSession {
            mode: PublishMode::Push {
                remote_url: remote_url.into(),
            },
            remote: DEFAULT_REMOTE.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            commit_message: DEFAULT_COMMIT_MESSAGE.to_string(),
        }
    }

    /// Session for the deploy variant with the default remote, branch and message.
    pub fn deploy() -> Self {
        PublishSession {
            mode: PublishMode::Deploy,
            ..Self::push(String::new())
        }
    }

    /// Builds a session from configured names.
    pub fn from_config(mode: PublishMode, config: &PublishConfig) -> Self {
        PublishSession {
            mode,
            remote: config.remote.clone(),
            branch: config.branch.clone(),
            commit_message: config.commit_message.clone(),
        }
    }

    /// Validated remote URL for the push variant, `None` for deploy.
    pub fn remote_url(&self) -> Result<Option<RemoteUrl>> {
        match &self.mode {
            PublishMode::Deploy => Ok(None),
            PublishMode::Push { remote_url } => RemoteUrl::parse(remote_url).map(Some),
        }
    }
}
