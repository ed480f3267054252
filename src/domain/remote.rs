use regex::Regex;

use crate::error::{PublishError, Result};

/// Validated remote URL supplied by the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteUrl(String);

impl RemoteUrl {
    /// Parse operator input into a remote URL.
    ///
    /// Surrounding whitespace is dropped. Empty input is rejected; any other
    /// string is accepted, since the version-control tool is the final judge.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(PublishError::invalid_input("remote URL must not be empty"));
        }
        Ok(RemoteUrl(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the URL has a shape git understands as a remote.
    ///
    /// Recognized shapes:
    /// - `http(s)://`, `ssh://`, `git://`, `file://` URLs
    /// - scp-like `user@host:path`
    /// - local filesystem paths (absolute, relative with `.`, or a Windows drive)
    pub fn is_recognized(&self) -> bool {
        let patterns = [
            r"^(?i)(https?|ssh|git|file)://\S+$",
            r"^[\w.-]+@[\w.-]+:\S+$",
            r"^(/|\./|\.\./|~/)",
            r"^[A-Za-z]:[\\/]",
            r"^\\\\",
        ];

        patterns.iter().any(|pattern| {
            Regex::new(pattern)
                .map(|re| re.is_match(&self.0))
                .unwrap_or(false)
        })
    }
}

impl std::fmt::Display for RemoteUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
