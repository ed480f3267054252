// tests/integration_test.rs
//
// Runs the workflow against the real `git` executable, with a local bare
// repository standing in for the remote.
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use repo_publish::cli::{publish, StepOutcome};
use repo_publish::domain::PublishSession;
use repo_publish::git::{GitCli, PublishContext, Repository, RepositorySnapshot};
use repo_publish::PublishError;
use tempfile::TempDir;

const COMMIT_MESSAGE: &str = "Initial commit: FastAPI blog backend";

/// These tests drive the real executable; a machine without it must fail loudly.
fn require_git() {
    assert!(
        which::which("git").is_ok(),
        "the `git` executable must be on PATH to run the integration tests"
    );
}

/// Environment that keeps the developer's own git configuration out of the tests.
fn isolated_env(home: &Path) -> Vec<(String, String)> {
    let home = home.to_string_lossy().into_owned();
    vec![
        ("HOME".to_string(), home.clone()),
        ("XDG_CONFIG_HOME".to_string(), home),
        ("GIT_CONFIG_NOSYSTEM".to_string(), "1".to_string()),
        ("GIT_TERMINAL_PROMPT".to_string(), "0".to_string()),
        ("GIT_AUTHOR_NAME".to_string(), "Publisher".to_string()),
        ("GIT_AUTHOR_EMAIL".to_string(), "publisher@example.com".to_string()),
        ("GIT_COMMITTER_NAME".to_string(), "Publisher".to_string()),
        ("GIT_COMMITTER_EMAIL".to_string(), "publisher@example.com".to_string()),
    ]
}

struct Fixture {
    home: TempDir,
    work: TempDir,
    remote: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let fixture = Fixture {
            home: TempDir::new().unwrap(),
            work: TempDir::new().unwrap(),
            remote: TempDir::new().unwrap(),
        };
        fs::write(fixture.work.path().join("main.py"), "app = None\n").unwrap();
        fs::write(fixture.work.path().join("requirements.txt"), "fastapi\n").unwrap();
        git2::Repository::init_bare(fixture.remote.path()).unwrap();
        fixture
    }

    fn remote_url(&self) -> String {
        self.remote.path().to_string_lossy().into_owned()
    }

    fn git(&self) -> GitCli {
        let ctx = isolated_env(self.home.path())
            .into_iter()
            .fold(PublishContext::new(self.work.path()), |ctx, (k, v)| {
                ctx.with_env(k, v)
            });
        GitCli::new(ctx)
    }

    fn binary(&self, args: &[&str]) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_repo-publish"));
        cmd.arg("-C")
            .arg(self.work.path())
            .arg("--no-pause")
            .args(args)
            .stdin(Stdio::null());
        for (key, value) in isolated_env(self.home.path()) {
            cmd.env(key, value);
        }
        cmd.output().expect("Failed to execute repo-publish")
    }

    /// Runs the binary without `--no-pause`, feeding `input` on stdin.
    fn binary_with_input(&self, args: &[&str], input: &str) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_repo-publish"));
        cmd.arg("-C")
            .arg(self.work.path())
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for (key, value) in isolated_env(self.home.path()) {
            cmd.env(key, value);
        }

        let mut child = cmd.spawn().expect("Failed to execute repo-publish");
        child
            .stdin
            .take()
            .expect("stdin is piped")
            .write_all(input.as_bytes())
            .expect("Failed to write stdin");
        child.wait_with_output().expect("Failed to wait for repo-publish")
    }

    fn write_config(&self, content: &str) -> String {
        let path = self.home.path().join("publish.toml");
        fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }
}

const PAUSE_PROMPT: &str = "Press Enter to exit";

#[test]
fn test_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_repo-publish"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("repo-publish"));
    assert!(stdout.contains("--remote-url"));
    assert!(stdout.contains("--deploy"));
}

#[test]
fn test_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_repo-publish"))
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_fresh_directory_publish() {
    require_git();
    let fixture = Fixture::new();
    let session = PublishSession::push(fixture.remote_url());

    let report = publish(&session, &fixture.git(), |_| {}).unwrap();

    assert_eq!(report.outcomes[0], StepOutcome::RepositoryInitialized);
    assert!(report.committed());
    assert!(report.pushed());

    let local = RepositorySnapshot::capture(fixture.work.path())
        .unwrap()
        .expect("repository should exist");
    assert_eq!(local.branch.as_deref(), Some("main"));
    assert_eq!(local.remote_url("origin"), Some(fixture.remote_url().as_str()));
    assert_eq!(local.remotes.len(), 1);
    assert_eq!(local.head_summary.as_deref(), Some(COMMIT_MESSAGE));
    assert_eq!(local.upstream.as_deref(), Some("origin/main"));

    let remote = RepositorySnapshot::capture(fixture.remote.path())
        .unwrap()
        .unwrap();
    assert_eq!(
        remote.branches.get("main").map(String::as_str),
        Some(COMMIT_MESSAGE)
    );
}

#[test]
fn test_second_run_creates_no_commit() {
    require_git();
    let fixture = Fixture::new();
    let session = PublishSession::push(fixture.remote_url());
    let git = fixture.git();

    publish(&session, &git, |_| {}).unwrap();
    let first = RepositorySnapshot::capture(fixture.work.path())
        .unwrap()
        .unwrap();

    let report = publish(&session, &git, |_| {}).unwrap();
    let second = RepositorySnapshot::capture(fixture.work.path())
        .unwrap()
        .unwrap();

    assert!(!report.committed());
    assert!(report.pushed());
    assert!(report.outcomes.contains(&StepOutcome::RepositoryExisted));
    assert_eq!(first.head_oid, second.head_oid);
    assert_eq!(second.remotes.len(), 1);
}

#[test]
fn test_ensure_repository_twice_and_remote_overwrite() {
    require_git();
    let fixture = Fixture::new();
    let git = fixture.git();

    git.init().unwrap();
    assert!(git.is_initialized().unwrap());
    assert!(!git.remove_remote("origin").unwrap());

    git.add_remote("origin", "https://old.example.com/r.git").unwrap();
    assert!(git.remove_remote("origin").unwrap());
    git.add_remote("origin", "https://example.com/r.git").unwrap();

    assert_eq!(
        git.remote_url("origin").unwrap().as_deref(),
        Some("https://example.com/r.git")
    );
    assert_eq!(git.remote_url("upstream").unwrap(), None);
}

#[test]
fn test_staged_detection() {
    require_git();
    let fixture = Fixture::new();
    let git = fixture.git();

    git.init().unwrap();
    assert!(!git.has_staged_changes().unwrap());
    git.stage_all().unwrap();
    assert!(git.has_staged_changes().unwrap());
    git.commit(COMMIT_MESSAGE).unwrap();
    assert!(!git.has_staged_changes().unwrap());
}

#[test]
fn test_push_to_missing_remote_propagates_exit_code() {
    require_git();
    let fixture = Fixture::new();
    let missing = fixture.home.path().join("no-such-remote.git");
    let session = PublishSession::push(missing.to_string_lossy());

    let err = publish(&session, &fixture.git(), |_| {}).unwrap_err();

    match &err {
        PublishError::CommandFailed { command, code, .. } => {
            assert!(command.contains("push -u origin main"));
            assert_ne!(*code, Some(0));
        }
        other => panic!("expected CommandFailed, got {:?}", other),
    }

    // Earlier steps stay in place
    let local = RepositorySnapshot::capture(fixture.work.path())
        .unwrap()
        .unwrap();
    assert_eq!(local.branch.as_deref(), Some("main"));
    assert_eq!(local.head_summary.as_deref(), Some(COMMIT_MESSAGE));
}

#[test]
fn test_binary_empty_url_exits_with_one() {
    require_git();
    let fixture = Fixture::new();

    let output = fixture.binary(&[]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("remote URL must not be empty"), "stderr: {}", stderr);
    assert!(!fixture.work.path().join(".git").exists());
}

#[test]
fn test_binary_missing_tool_exits_with_one() {
    let fixture = Fixture::new();
    let config = fixture.home.path().join("publish.toml");
    fs::write(&config, "[tool]\nprogram = \"repo-publish-no-such-tool\"\n").unwrap();

    let output = fixture.binary(&[
        "--config",
        config.to_str().unwrap(),
        "--remote-url",
        "https://example.com/r.git",
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("was not found on PATH"), "stderr: {}", stderr);
    assert!(!fixture.work.path().join(".git").exists());
}

#[test]
fn test_binary_status_without_repository() {
    let fixture = Fixture::new();
    let output = fixture.binary(&["--status"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Repository: none"));
}

#[test]
fn test_binary_dry_run_changes_nothing() {
    require_git();
    let fixture = Fixture::new();
    let output = fixture.binary(&["--dry-run", "--remote-url", "https://example.com/r.git"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("git push -u origin main"));
    assert!(!fixture.work.path().join(".git").exists());
}

#[test]
fn test_binary_deploy_prints_next_steps() {
    require_git();
    let fixture = Fixture::new();
    let output = fixture.binary(&["--deploy"]);

    assert!(output.status.success(), "{:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("git remote add origin"));
    assert!(stdout.contains("git push -u origin main"));

    let local = RepositorySnapshot::capture(fixture.work.path())
        .unwrap()
        .unwrap();
    assert_eq!(local.head_summary.as_deref(), Some(COMMIT_MESSAGE));
    assert!(local.remotes.is_empty());
}

#[test]
fn test_binary_push_end_to_end() {
    require_git();
    let fixture = Fixture::new();
    let url = fixture.remote_url();
    let output = fixture.binary(&["--remote-url", &url]);

    assert!(output.status.success(), "{:?}", output);
    let remote = RepositorySnapshot::capture(fixture.remote.path())
        .unwrap()
        .unwrap();
    assert_eq!(
        remote.branches.get("main").map(String::as_str),
        Some(COMMIT_MESSAGE)
    );

    let status = fixture.binary(&["--status"]);
    let stdout = String::from_utf8_lossy(&status.stdout);
    assert!(stdout.contains("Branch:     main"));
    assert!(stdout.contains("Upstream:   origin/main"));
}

#[test]
fn test_binary_pauses_after_success() {
    require_git();
    let fixture = Fixture::new();

    let output = fixture.binary_with_input(&["--deploy"], "\n");

    assert!(output.status.success(), "{:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(PAUSE_PROMPT), "stdout: {}", stdout);
}

#[test]
fn test_binary_pauses_after_invalid_input() {
    require_git();
    let fixture = Fixture::new();

    let output = fixture.binary_with_input(&[], "\n");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(PAUSE_PROMPT), "stdout: {}", stdout);
    assert!(!fixture.work.path().join(".git").exists());
}

#[test]
fn test_binary_pauses_after_config_error() {
    let fixture = Fixture::new();
    let config = fixture.write_config("[publish\nbranch = ");

    let output = fixture.binary_with_input(
        &["--config", &config, "--remote-url", "https://example.com/r.git"],
        "\n",
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error loading config"), "stderr: {}", stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(PAUSE_PROMPT), "stdout: {}", stdout);
    assert!(!fixture.work.path().join(".git").exists());
}

#[test]
fn test_binary_config_error_honours_no_pause() {
    let fixture = Fixture::new();
    let config = fixture.write_config("[publish\nbranch = ");

    let output = fixture.binary(&[
        "--config",
        &config,
        "--remote-url",
        "https://example.com/r.git",
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains(PAUSE_PROMPT), "stdout: {}", stdout);
}

#[test]
fn test_binary_pause_disabled_by_config() {
    require_git();
    let fixture = Fixture::new();
    let config = fixture.write_config("[behavior]\npause_on_exit = false\n");

    let output = fixture.binary_with_input(&["--config", &config, "--deploy"], "\n");

    assert!(output.status.success(), "{:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains(PAUSE_PROMPT), "stdout: {}", stdout);
}
