use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::config::DEFAULT_PROGRAM;
use crate::error::{PublishError, Result};

/// Explicit execution context for version-control commands.
///
/// Carries the working directory, the program to run and any extra
/// environment, so nothing depends on the process-wide current directory.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishContext {
    pub work_dir: PathBuf,
    pub program: String,
    pub envs: Vec<(String, String)>,
    pub verbose: bool,
}

impl PublishContext {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        PublishContext {
            work_dir: work_dir.into(),
            program: DEFAULT_PROGRAM.to_string(),
            envs: Vec::new(),
            verbose: false,
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }
}

/// Outcome of one external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub command: String,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    fn into_result(self) -> Result<CommandOutput> {
        if self.success() {
            Ok(self)
        } else {
            Err(PublishError::CommandFailed {
                command: self.command,
                code: self.code,
                stdout: self.stdout,
                stderr: self.stderr,
            })
        }
    }
}

/// Renders a command line for display, quoting arguments that contain whitespace.
pub fn render_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .map(|part| {
            if part.is_empty() || part.chars().any(char::is_whitespace) {
                format!("\"{}\"", part)
            } else {
                part.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn build(ctx: &PublishContext, args: &[&str]) -> Command {
    let mut cmd = Command::new(&ctx.program);
    cmd.args(args).current_dir(&ctx.work_dir);
    for (key, value) in &ctx.envs {
        cmd.env(key, value);
    }
    cmd
}

fn spawn_error(ctx: &PublishContext, err: std::io::Error) -> PublishError {
    if err.kind() == ErrorKind::NotFound && ctx.work_dir.is_dir() {
        PublishError::tool_missing(&ctx.program)
    } else {
        PublishError::Io(err)
    }
}

/// Runs a command with captured output.
///
/// A non-zero exit maps to [`PublishError::CommandFailed`] carrying the
/// command line, exit code and both output streams.
pub fn run(ctx: &PublishContext, args: &[&str]) -> Result<CommandOutput> {
    let command = render_command(&ctx.program, args);
    if ctx.verbose {
        crate::ui::display_command(&command);
    }

    let output = build(ctx, args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| spawn_error(ctx, e))?;

    CommandOutput {
        command,
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
    .into_result()
}

/// Runs a command attached to the operator's terminal.
///
/// The tool's own progress, prompts and errors reach the operator verbatim;
/// nothing is captured.
pub fn run_inherited(ctx: &PublishContext, args: &[&str]) -> Result<CommandOutput> {
    let command = render_command(&ctx.program, args);
    if ctx.verbose {
        crate::ui::display_command(&command);
    }

    let status = build(ctx, args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| spawn_error(ctx, e))?;

    CommandOutput {
        command,
        code: status.code(),
        stdout: String::new(),
        stderr: String::new(),
    }
    .into_result()
}
