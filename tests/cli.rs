use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

const BIN: &str = env!("CARGO_BIN_EXE_cc-guardrails");

/// Run the binary with an isolated HOME (no user overlay, private log).
fn run_hook(home: &Path, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(BIN)
        .args(args)
        .env("HOME", home)
        .env("CC_GUARDRAILS_CONFIG", home.join("absent.toml"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    // The child may exit before reading (flags, unknown evaluator).
    let _ = child.stdin.take().unwrap().write_all(stdin.as_bytes());
    child.wait_with_output().unwrap()
}

fn bash_payload(command: &str, cwd: &Path) -> String {
    serde_json::json!({
        "hook_event_name": "PreToolUse",
        "tool_name": "Bash",
        "tool_input": { "command": command },
        "cwd": cwd,
    })
    .to_string()
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .is_ok_and(|o| o.status.success())
}

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .unwrap();
    assert!(status.success(), "git {args:?}");
}

/// A repository on `main` with one commit.
fn init_repo(dir: &Path) {
    git(dir, &["init", "-q", "-b", "main"]);
    std::fs::write(dir.join("README.md"), "hi\n").unwrap();
    git(dir, &["add", "."]);
    git(
        dir,
        &["-c", "user.name=t", "-c", "user.email=t@example.com", "commit", "-qm", "init"],
    );
}

#[test]
fn empty_stdin_is_silent() {
    let home = tempfile::tempdir().unwrap();
    let out = run_hook(home.path(), &["pre-push"], "");
    assert_eq!(out.status.code(), Some(0));
    assert!(out.stdout.is_empty());
    assert!(out.stderr.is_empty());
}

#[test]
fn garbage_stdin_is_silent() {
    let home = tempfile::tempdir().unwrap();
    let out = run_hook(home.path(), &["protect-files"], "{not json");
    assert_eq!(out.status.code(), Some(0));
    assert!(out.stdout.is_empty());
}

#[test]
fn ask_prints_hook_json() {
    let home = tempfile::tempdir().unwrap();
    let out = run_hook(
        home.path(),
        &["pre-install"],
        &bash_payload("npm install lodash", home.path()),
    );
    assert_eq!(out.status.code(), Some(0));
    let v: serde_json::Value = serde_json::from_str(stdout(&out).trim()).unwrap();
    assert_eq!(v["hookSpecificOutput"]["permissionDecision"], "ask");
    assert_eq!(v["hookSpecificOutput"]["hookEventName"], "PreToolUse");
    assert!(
        v["hookSpecificOutput"]["permissionDecisionReason"]
            .as_str()
            .unwrap()
            .contains("new dependency")
    );
}

#[test]
fn allow_prints_nothing() {
    let home = tempfile::tempdir().unwrap();
    let out = run_hook(home.path(), &["pre-install"], &bash_payload("npm ci", home.path()));
    assert_eq!(out.status.code(), Some(0));
    assert!(out.stdout.is_empty());
    assert!(out.stderr.is_empty());
}

#[test]
fn block_exits_two_with_reason() {
    let home = tempfile::tempdir().unwrap();
    let out = run_hook(
        home.path(),
        &["pre-pr"],
        &bash_payload("gh pr create --fill", home.path()),
    );
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("BLOCKED: PR creation requires approval"));
    assert!(out.stdout.is_empty());
}

#[test]
fn decision_is_logged() {
    let home = tempfile::tempdir().unwrap();
    run_hook(
        home.path(),
        &["pre-terraform"],
        &bash_payload("terraform destroy", home.path()),
    );
    let log = std::fs::read_to_string(
        home.path().join(".local/share/cc-guardrails/decisions.log"),
    )
    .unwrap();
    assert!(log.contains("pre-terraform\tASK\tterraform destroy\t"), "{log}");
}

#[test]
fn decision_is_logged_at_warn_level() {
    let home = tempfile::tempdir().unwrap();
    let overlay = home.path().join("overlay.toml");
    std::fs::write(&overlay, "[settings]\nlog_level = \"warn\"\n").unwrap();
    let mut child = Command::new(BIN)
        .arg("pre-terraform")
        .env("HOME", home.path())
        .env("CC_GUARDRAILS_CONFIG", &overlay)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    let payload = bash_payload("terraform apply", home.path());
    let _ = child.stdin.take().unwrap().write_all(payload.as_bytes());
    child.wait_with_output().unwrap();

    let log = std::fs::read_to_string(
        home.path().join(".local/share/cc-guardrails/decisions.log"),
    )
    .unwrap();
    assert!(log.contains("pre-terraform\tASK\tterraform apply\t"), "{log}");
}

#[test]
fn unknown_evaluator_exits_one_with_usage() {
    let home = tempfile::tempdir().unwrap();
    let out = run_hook(home.path(), &["pre-everything"], "{}");
    assert_eq!(out.status.code(), Some(1));
    let err = stderr(&out);
    assert!(err.contains("unknown evaluator: pre-everything"));
    assert!(err.contains("usage: cc-guardrails"));
}

#[test]
fn no_arguments_exits_one() {
    let home = tempfile::tempdir().unwrap();
    let out = run_hook(home.path(), &[], "");
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("usage"));
}

#[test]
fn list_prints_evaluators() {
    let home = tempfile::tempdir().unwrap();
    let out = run_hook(home.path(), &["--list"], "");
    assert_eq!(out.status.code(), Some(0));
    let names: Vec<String> = stdout(&out).lines().map(String::from).collect();
    assert!(names.contains(&"pre-push".to_string()));
    assert!(names.contains(&"teammate-idle".to_string()));
    assert!(names.contains(&"pre-tool-use".to_string()));
}

#[test]
fn dump_config_is_toml() {
    let home = tempfile::tempdir().unwrap();
    let out = run_hook(home.path(), &["--dump-config"], "");
    assert_eq!(out.status.code(), Some(0));
    let parsed: toml::Value = toml::from_str(&stdout(&out)).unwrap();
    assert!(parsed["branches"]["protected"].as_array().is_some());
}

#[test]
fn overlay_file_is_applied() {
    let home = tempfile::tempdir().unwrap();
    let overlay = home.path().join("overlay.toml");
    std::fs::write(&overlay, "[branches]\nprotected = [\"release\"]\n").unwrap();
    let out = Command::new(BIN)
        .arg("--dump-config")
        .env("HOME", home.path())
        .env("CC_GUARDRAILS_CONFIG", &overlay)
        .output()
        .unwrap();
    assert!(stdout(&out).contains("\"release\""));
}

#[test]
fn version_flag() {
    let home = tempfile::tempdir().unwrap();
    let out = run_hook(home.path(), &["--version"], "");
    assert_eq!(out.status.code(), Some(0));
    assert!(stdout(&out).starts_with("cc-guardrails "));
}

#[test]
fn commit_on_main_in_real_repo_blocks() {
    if !git_available() {
        return;
    }
    let home = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    init_repo(work.path());
    let out = run_hook(
        home.path(),
        &["pre-commit"],
        &bash_payload("git commit -m 'feat: x'", work.path()),
    );
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("You are on the main branch"));

    git(work.path(), &["checkout", "-q", "-b", "feature-x"]);
    let out = run_hook(
        home.path(),
        &["pre-commit"],
        &bash_payload("git commit -m 'feat: x'", work.path()),
    );
    assert_eq!(out.status.code(), Some(0));
}

#[test]
fn task_completed_in_real_repo() {
    if !git_available() {
        return;
    }
    let home = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    init_repo(work.path());
    let payload = serde_json::json!({
        "hook_event_name": "TaskCompleted",
        "cwd": work.path(),
    })
    .to_string();

    let out = run_hook(home.path(), &["task-completed"], &payload);
    assert_eq!(out.status.code(), Some(0));

    std::fs::create_dir_all(work.path().join("src")).unwrap();
    std::fs::write(work.path().join("src/app.ts"), "export {};\n").unwrap();
    let out = run_hook(home.path(), &["task-completed"], &payload);
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("  - src/app.ts"));
}

#[test]
fn deletion_inside_real_repo_allows() {
    if !git_available() {
        return;
    }
    let home = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    init_repo(work.path());
    let out = run_hook(
        home.path(),
        &["protect-files"],
        &bash_payload("rm -rf build README.md", work.path()),
    );
    assert_eq!(out.status.code(), Some(0));
    assert!(out.stdout.is_empty());
}
