//! Main workflow orchestration logic
//!
//! The publish sequence is linear: every step is idempotent, every failure
//! is fatal for the run, and effects of completed steps stay in place so a
//! second run picks up where the first stopped.

use std::fmt;
use std::path::PathBuf;

use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::{PublishMode, PublishSession, RemoteUrl};
use crate::error::Result;
use crate::git::{GitCli, PublishContext, Repository};

/// One step of the publish sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    EnsureRepository,
    StageAll,
    Commit,
    ConfigureRemote,
    SetBranch,
    Push,
    ManualInstructions,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Step::EnsureRepository => "Ensuring repository exists",
            Step::StageAll => "Staging all files",
            Step::Commit => "Committing staged changes",
            Step::ConfigureRemote => "Configuring remote",
            Step::SetBranch => "Setting branch name",
            Step::Push => "Pushing with upstream tracking",
            Step::ManualInstructions => "Preparing next steps",
        };
        f.write_str(text)
    }
}

/// What a finished step did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    RepositoryInitialized,
    RepositoryExisted,
    Staged,
    Committed { message: String },
    NothingToCommit,
    RemoteConfigured { remote: String, url: String },
    BranchSet { branch: String },
    Pushed { remote: String, branch: String },
    /// Deploy variant: commands the operator runs by hand
    ManualInstructions { commands: Vec<String> },
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::RepositoryInitialized => write!(f, "Initialized new repository"),
            StepOutcome::RepositoryExisted => write!(f, "Repository already exists"),
            StepOutcome::Staged => write!(f, "Staged working copy"),
            StepOutcome::Committed { message } => write!(f, "Committed: {}", message),
            StepOutcome::NothingToCommit => write!(f, "Nothing to commit"),
            StepOutcome::RemoteConfigured { remote, url } => {
                write!(f, "Remote '{}' -> {}", remote, url)
            }
            StepOutcome::BranchSet { branch } => write!(f, "On branch '{}'", branch),
            StepOutcome::Pushed { remote, branch } => {
                write!(f, "Pushed '{}' to '{}' with upstream tracking", branch, remote)
            }
            StepOutcome::ManualInstructions { commands } => {
                write!(f, "{} command(s) left to run by hand", commands.len())
            }
        }
    }
}

/// Progress notifications emitted while the workflow runs
#[derive(Debug, Clone, PartialEq)]
pub enum Progress<'a> {
    Started(Step),
    Finished(&'a StepOutcome),
    Warning(&'a BoundaryWarning),
}

/// Everything a run did, in order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PublishReport {
    pub outcomes: Vec<StepOutcome>,
    pub warnings: Vec<BoundaryWarning>,
}

impl PublishReport {
    pub fn pushed(&self) -> bool {
        self.outcomes
            .iter()
            .any(|o| matches!(o, StepOutcome::Pushed { .. }))
    }

    pub fn committed(&self) -> bool {
        self.outcomes
            .iter()
            .any(|o| matches!(o, StepOutcome::Committed { .. }))
    }

    fn finish<F: FnMut(Progress<'_>)>(&mut self, outcome: StepOutcome, on_progress: &mut F) {
        on_progress(Progress::Finished(&outcome));
        self.outcomes.push(outcome);
    }

    fn warn<F: FnMut(Progress<'_>)>(&mut self, warning: BoundaryWarning, on_progress: &mut F) {
        on_progress(Progress::Warning(&warning));
        self.warnings.push(warning);
    }
}

/// Commands the deploy variant leaves to the operator
pub fn manual_commands(session: &PublishSession) -> Vec<String> {
    vec![
        format!("git remote add {} <REMOTE_URL>", session.remote),
        format!("git branch -M {}", session.branch),
        format!("git push -u {} {}", session.remote, session.branch),
    ]
}

/// Checks that must pass before anything is touched.
///
/// Tool presence is checked first, then the remote URL.
fn preflight<R: Repository + ?Sized>(
    session: &PublishSession,
    repo: &R,
) -> Result<Option<RemoteUrl>> {
    repo.check_tool()?;
    session.remote_url()
}

/// Idempotent `init`
pub fn ensure_repository<R: Repository + ?Sized>(repo: &R) -> Result<StepOutcome> {
    if repo.is_initialized()? {
        Ok(StepOutcome::RepositoryExisted)
    } else {
        repo.init()?;
        Ok(StepOutcome::RepositoryInitialized)
    }
}

/// Commit only when the index holds something
pub fn commit_if_staged<R: Repository + ?Sized>(repo: &R, message: &str) -> Result<StepOutcome> {
    if repo.has_staged_changes()? {
        repo.commit(message)?;
        Ok(StepOutcome::Committed {
            message: message.to_string(),
        })
    } else {
        Ok(StepOutcome::NothingToCommit)
    }
}

/// Remove-then-add, so the remote ends up pointing at `url` whatever was there.
///
/// Returns the URL that was replaced, if it differed.
pub fn configure_remote<R: Repository + ?Sized>(
    repo: &R,
    remote: &str,
    url: &str,
) -> Result<(StepOutcome, Option<String>)> {
    let previous = repo.remote_url(remote)?;
    repo.remove_remote(remote)?;
    repo.add_remote(remote, url)?;

    let replaced = previous.filter(|prev| prev != url);
    Ok((
        StepOutcome::RemoteConfigured {
            remote: remote.to_string(),
            url: url.to_string(),
        },
        replaced,
    ))
}

/// Runs the publish sequence against `repo`.
///
/// # Arguments
/// * `session` - Variant, names and remote URL for this run
/// * `repo` - Working copy to operate on
/// * `on_progress` - Called before each step, after each step and for every warning
///
/// # Returns
/// * `Ok(PublishReport)` - Every step succeeded
/// * `Err(ToolMissing | InvalidInput)` - Before any mutation
/// * `Err(CommandFailed)` - A step failed; earlier steps keep their effects
pub fn publish<R, F>(
    session: &PublishSession,
    repo: &R,
    mut on_progress: F,
) -> Result<PublishReport>
where
    R: Repository + ?Sized,
    F: FnMut(Progress<'_>),
{
    let remote_url = preflight(session, repo)?;
    let mut report = PublishReport::default();

    if let Some(url) = &remote_url {
        if !url.is_recognized() {
            report.warn(
                BoundaryWarning::UnrecognizedRemoteUrl {
                    url: url.to_string(),
                },
                &mut on_progress,
            );
        }
    }

    on_progress(Progress::Started(Step::EnsureRepository));
    let outcome = ensure_repository(repo)?;
    report.finish(outcome, &mut on_progress);

    on_progress(Progress::Started(Step::StageAll));
    repo.stage_all()?;
    report.finish(StepOutcome::Staged, &mut on_progress);

    on_progress(Progress::Started(Step::Commit));
    let outcome = commit_if_staged(repo, &session.commit_message)?;
    if outcome == StepOutcome::NothingToCommit {
        report.warn(BoundaryWarning::NothingToCommit, &mut on_progress);
    }
    report.finish(outcome, &mut on_progress);

    let Some(url) = remote_url else {
        on_progress(Progress::Started(Step::ManualInstructions));
        report.finish(
            StepOutcome::ManualInstructions {
                commands: manual_commands(session),
            },
            &mut on_progress,
        );
        return Ok(report);
    };

    on_progress(Progress::Started(Step::ConfigureRemote));
    let (outcome, replaced) = configure_remote(repo, &session.remote, url.as_str())?;
    if let Some(previous_url) = replaced {
        report.warn(
            BoundaryWarning::RemoteReplaced {
                remote: session.remote.clone(),
                previous_url,
                new_url: url.to_string(),
            },
            &mut on_progress,
        );
    }
    report.finish(outcome, &mut on_progress);

    on_progress(Progress::Started(Step::SetBranch));
    repo.force_branch(&session.branch)?;
    report.finish(
        StepOutcome::BranchSet {
            branch: session.branch.clone(),
        },
        &mut on_progress,
    );

    on_progress(Progress::Started(Step::Push));
    repo.push_upstream(&session.remote, &session.branch)?;
    report.finish(
        StepOutcome::Pushed {
            remote: session.remote.clone(),
            branch: session.branch.clone(),
        },
        &mut on_progress,
    );

    Ok(report)
}

/// Steps a real run would execute, without touching anything.
///
/// Performs the same preflight checks as [publish].
pub fn plan<R: Repository + ?Sized>(session: &PublishSession, repo: &R) -> Result<Vec<String>> {
    let remote_url = preflight(session, repo)?;

    let mut steps = Vec::new();
    if repo.is_initialized()? {
        steps.push("Use existing repository".to_string());
    } else {
        steps.push("git init".to_string());
    }
    steps.push("git add -A".to_string());
    steps.push(format!(
        "git commit -m \"{}\" (only if changes are staged)",
        session.commit_message
    ));

    match remote_url {
        Some(url) => {
            steps.push(format!("git remote remove {} (if present)", session.remote));
            steps.push(format!("git remote add {} {}", session.remote, url));
            steps.push(format!("git branch -M {}", session.branch));
            steps.push(format!("git push -u {} {}", session.remote, session.branch));
        }
        None => {
            steps.push("Print the remaining commands:".to_string());
            steps.extend(manual_commands(session).into_iter().map(|c| format!("  {}", c)));
        }
    }

    Ok(steps)
}

/// Arguments for the publish workflow
///
/// Mirrors the CLI Args but in a format suitable for orchestration logic.
/// This decoupling allows the workflow to be called programmatically
/// without depending on clap.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishWorkflowArgs {
    /// Working copy to publish
    pub work_dir: PathBuf,

    /// Remote URL; `None` selects the deploy variant
    pub remote_url: Option<String>,

    /// Echo every command before running it
    pub verbose: bool,
}

/// Result of a successful publish workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// The branch that was published
    pub branch: String,

    /// Whether a new commit was created
    pub committed: bool,

    /// Whether the branch was pushed to the remote
    pub pushed: bool,

    pub report: PublishReport,
}

/// Builds the session and context from configuration and runs [publish]
/// against the `git` executable.
pub fn run_publish_workflow<F>(
    args: PublishWorkflowArgs,
    config: &Config,
    on_progress: F,
) -> Result<WorkflowResult>
where
    F: FnMut(Progress<'_>),
{
    let mode = match args.remote_url {
        Some(remote_url) => PublishMode::Push { remote_url },
        None => PublishMode::Deploy,
    };
    let session = PublishSession::from_config(mode, &config.publish);

    let ctx = PublishContext::new(args.work_dir)
        .with_program(config.tool.program.clone())
        .with_verbose(args.verbose || config.behavior.verbose);
    let repo = GitCli::new(ctx);

    let report = publish(&session, &repo, on_progress)?;

    Ok(WorkflowResult {
        branch: session.branch,
        committed: report.committed(),
        pushed: report.pushed(),
        report,
    })
}
