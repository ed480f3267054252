use std::fmt;

/// Non-fatal conditions met while publishing.
/// These are reported to the operator but never stop the run.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// Staging found nothing new, so no commit was created
    NothingToCommit,
    /// An existing remote pointed somewhere else and was overwritten
    RemoteReplaced {
        remote: String,
        previous_url: String,
        new_url: String,
    },
    /// The remote URL does not look like anything git accepts as a remote
    UnrecognizedRemoteUrl { url: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NothingToCommit => {
                write!(f, "No staged changes; skipping commit")
            }
            BoundaryWarning::RemoteReplaced {
                remote,
                previous_url,
                new_url,
            } => {
                write!(
                    f,
                    "Remote '{}' pointed at '{}'; replaced with '{}'",
                    remote, previous_url, new_url
                )
            }
            BoundaryWarning::UnrecognizedRemoteUrl { url } => {
                write!(
                    f,
                    "Remote URL '{}' does not look like a git URL or path",
                    url
                )
            }
        }
    }
}
