use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;

use repo_publish::cli::{self, PublishWorkflowArgs};
use repo_publish::config::{self, Config};
use repo_publish::domain::{PublishMode, PublishSession};
use repo_publish::git::{GitCli, PublishContext, Repository, RepositorySnapshot};
use repo_publish::{ui, PublishError};

#[derive(clap::Parser)]
#[command(
    name = "repo-publish",
    about = "Initialize, commit and push a working copy to a remote repository"
)]
struct Args {
    #[arg(short = 'C', long, default_value = ".", help = "Working copy to publish")]
    dir: PathBuf,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Remote repository URL (prompted when omitted)")]
    remote_url: Option<String>,

    #[arg(long, help = "Commit locally and print the remaining commands instead of pushing")]
    deploy: bool,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(long, help = "Show repository status and exit")]
    status: bool,

    #[arg(short, long, help = "Echo every git command before running it")]
    verbose: bool,

    #[arg(long, help = "Exit without waiting for Enter")]
    no_pause: bool,

    #[arg(long, help = "Print version information")]
    version: bool,
}

fn main() {
    let args = Args::parse();

    if args.version {
        println!("repo-publish {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    // A broken config still gets the default pause before exiting
    let (config, code) = match config::load_config(args.config.as_deref(), &args.dir) {
        Ok(cfg) => {
            let code = match run(&args, &cfg) {
                Ok(()) => 0,
                Err(e) => report_failure(&e),
            };
            (cfg, code)
        }
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            (Config::default(), 1)
        }
    };

    if config.behavior.pause_on_exit && !args.no_pause && !args.status {
        if let Err(e) = ui::pause_for_acknowledgment() {
            ui::display_error(&format!("Could not wait for acknowledgment: {}", e));
        }
    }

    std::process::exit(code);
}

fn run(args: &Args, config: &Config) -> Result<()> {
    if args.status {
        return show_status(&args.dir);
    }

    // The tool check comes before any prompt
    let git = GitCli::new(
        PublishContext::new(args.dir.clone()).with_program(config.tool.program.clone()),
    );
    git.check_tool()?;

    // Push variant: flag, then config, then prompt
    let remote_url = if args.deploy {
        None
    } else if let Some(url) = args.remote_url.clone() {
        Some(url)
    } else if let Some(url) = config.publish.remote_url.clone() {
        Some(url)
    } else {
        Some(ui::prompt_remote_url()?)
    };

    if args.dry_run {
        return preview(config, &git, remote_url);
    }

    let result = cli::run_publish_workflow(
        PublishWorkflowArgs {
            work_dir: args.dir.clone(),
            remote_url,
            verbose: args.verbose,
        },
        config,
        ui::display_progress,
    )?;

    if result.pushed {
        ui::display_success(&format!(
            "Published branch '{}' to '{}'",
            result.branch, config.publish.remote
        ));
    } else {
        ui::display_success("Local repository is ready");
    }

    Ok(())
}

fn preview(config: &Config, repo: &GitCli, remote_url: Option<String>) -> Result<()> {
    let mode = match remote_url {
        Some(remote_url) => PublishMode::Push { remote_url },
        None => PublishMode::Deploy,
    };
    let session = PublishSession::from_config(mode, &config.publish);

    let steps = cli::plan(&session, repo)?;
    ui::display_plan(&steps);
    Ok(())
}

fn show_status(dir: &Path) -> Result<()> {
    let snapshot = RepositorySnapshot::capture(dir)?;
    ui::display_snapshot(snapshot.as_ref());
    Ok(())
}

/// Prints the failure and picks the exit code.
fn report_failure(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<PublishError>() {
        Some(publish_err) => {
            if let Some(output) = publish_err.tool_output() {
                ui::display_tool_output(output);
            }
            ui::display_error(&publish_err.to_string());
            if let PublishError::ToolMissing { tool } = publish_err {
                ui::display_status(&format!("Install {} and make sure it is on PATH", tool));
            }
            publish_err.exit_code()
        }
        None => {
            ui::display_error(&err.to_string());
            1
        }
    }
}
