use thiserror::Error;

/// Unified error type for repo-publish operations
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Required tool '{tool}' was not found on PATH")]
    ToolMissing { tool: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Command `{command}` failed with {}", describe_code(.code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// Convenience type alias for Results in repo-publish
pub type Result<T> = std::result::Result<T, PublishError>;

impl PublishError {
    /// Create a missing-tool error
    pub fn tool_missing(tool: impl Into<String>) -> Self {
        PublishError::ToolMissing { tool: tool.into() }
    }

    /// Create an invalid-input error with context
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        PublishError::InvalidInput(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        PublishError::Config(msg.into())
    }

    /// Process exit code for this error.
    ///
    /// External command failures propagate the tool's own code; everything
    /// else exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            PublishError::CommandFailed {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }

    /// Captured stderr of a failed command, if any was recorded.
    pub fn tool_output(&self) -> Option<&str> {
        match self {
            PublishError::CommandFailed { stderr, stdout, .. } => {
                let text = if stderr.trim().is_empty() {
                    stdout
                } else {
                    stderr
                };
                if text.trim().is_empty() {
                    None
                } else {
                    Some(text.as_str())
                }
            }
            _ => None,
        }
    }
}
