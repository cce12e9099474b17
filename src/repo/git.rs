//! Live repository queries through the `git` CLI.
//!
//! Every call is bounded by a timeout. Output pipes are drained on helper
//! threads so a large `git status` cannot fill the pipe and stall the child
//! while we poll it.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::RepoInspector;
use crate::config::Config;
use crate::error::GitError;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Run `git <args>` in `cwd`, returning stdout on success.
pub fn run_git(args: &[&str], cwd: &Path, timeout: Duration) -> Result<String, GitError> {
    let joined = args.join(" ");
    let mut child = Command::new("git")
        .args(args)
        .current_dir(cwd)
        // Read-only queries must not take the index lock.
        .env("GIT_OPTIONAL_LOCKS", "0")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(GitError::Spawn)?;

    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait().map_err(GitError::Wait)? {
            Some(status) => break status,
            None if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(GitError::Timeout {
                    args: joined,
                    timeout,
                });
            }
            None => thread::sleep(POLL_INTERVAL),
        }
    };

    let stdout = stdout.map(collect).unwrap_or_default();
    if status.success() {
        Ok(stdout)
    } else {
        Err(GitError::Failed {
            args: joined,
            code: status.code(),
            stderr: stderr.map(collect).unwrap_or_default().trim().to_string(),
        })
    }
}

fn drain<R: Read + Send + 'static>(mut reader: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = reader.read_to_end(&mut buf);
        buf
    })
}

fn collect(handle: JoinHandle<Vec<u8>>) -> String {
    let bytes = handle.join().unwrap_or_default();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Paths from `git status --porcelain` (v1) output whose name ends with one
/// of `extensions`. Lines too short to hold `XY path` are skipped.
pub fn parse_porcelain(output: &str, extensions: &[String]) -> Vec<String> {
    output
        .lines()
        .filter(|line| line.len() >= 4)
        .filter_map(|line| {
            let entry = line.get(3..)?.trim();
            // Renames and copies: `R  old -> new`
            let path = entry.rsplit_once(" -> ").map_or(entry, |(_, new)| new);
            let path = path.trim_matches('"');
            extensions
                .iter()
                .any(|ext| path.ends_with(ext.as_str()))
                .then(|| path.to_string())
        })
        .collect()
}

/// [`RepoInspector`] backed by the `git` binary, run in the event's working
/// directory.
#[derive(Debug)]
pub struct GitInspector {
    cwd: PathBuf,
    timeout: Duration,
    code_extensions: Vec<String>,
}

impl GitInspector {
    pub fn new(cwd: PathBuf, timeout: Duration, code_extensions: Vec<String>) -> Self {
        Self {
            cwd,
            timeout,
            code_extensions,
        }
    }

    pub fn from_config(config: &Config, cwd: PathBuf) -> Self {
        Self::new(
            cwd,
            Duration::from_millis(config.settings.git_timeout_ms),
            config.completion.code_extensions.clone(),
        )
    }
}

impl RepoInspector for GitInspector {
    fn current_branch(&self) -> String {
        match run_git(&["rev-parse", "--abbrev-ref", "HEAD"], &self.cwd, self.timeout) {
            Ok(out) => out.trim().to_string(),
            Err(e) => {
                log::debug!("current branch unknown: {e}");
                String::new()
            }
        }
    }

    fn dirty_code_files(&self) -> Vec<String> {
        let args = ["status", "--porcelain", "--untracked-files=all"];
        match run_git(&args, &self.cwd, self.timeout) {
            Ok(out) => parse_porcelain(&out, &self.code_extensions),
            Err(e) => {
                log::debug!("working tree status unknown: {e}");
                Vec::new()
            }
        }
    }

    fn working_dir(&self) -> &Path {
        &self.cwd
    }
}
