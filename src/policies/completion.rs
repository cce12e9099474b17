//! Lifecycle checks: work is not "done" while code changes are uncommitted.

use super::Policy;
use crate::config::Config;
use crate::eval::RuleMatch;
use crate::event::{ActionKind, Event};
use crate::repo::RepoInspector;

/// Blocks task completion while code files are dirty.
pub struct TaskCompletedPolicy {
    max_listed: usize,
}

impl TaskCompletedPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_listed: config.completion.max_listed,
        }
    }
}

/// `  - path` lines, capped at `max`, with a count of the rest.
fn file_list(files: &[String], max: usize) -> String {
    let mut out = files
        .iter()
        .take(max)
        .map(|f| format!("  - {f}"))
        .collect::<Vec<_>>()
        .join("\n");
    if files.len() > max {
        out.push_str(&format!("\n  ... and {} more", files.len() - max));
    }
    out
}

impl Policy for TaskCompletedPolicy {
    fn name(&self) -> &'static str {
        "task-completed"
    }

    fn guards_commands(&self) -> bool {
        false
    }

    fn evaluate(&self, event: &Event, repo: &dyn RepoInspector) -> RuleMatch {
        if !matches!(event.kind, ActionKind::TaskCompletion | ActionKind::Unspecified) {
            return RuleMatch::not_applicable();
        }
        let dirty = repo.dirty_code_files();
        if dirty.is_empty() {
            return RuleMatch::allow("no uncommitted code changes");
        }
        RuleMatch::block(format!(
            "BLOCKED: You have uncommitted code changes.\n\n\
             Uncommitted files:\n{}\n\n\
             Before marking this task complete, you MUST:\n\
             1. Run the project's test suite and confirm tests pass\n\
             2. Run the project's linter/formatter if available\n\
             3. Commit your changes with a conventional commit message\n\
             4. Then mark the task complete again",
            file_list(&dirty, self.max_listed)
        ))
    }
}

/// Nudges an idling teammate to commit first.
pub struct TeammateIdlePolicy;

const IDLE_NUDGE: &str = "You have uncommitted code changes. Before idling:\n\
     1. Run tests to verify your changes work\n\
     2. Commit your changes with a conventional commit message\n\
     3. Mark any completed tasks as done";

impl Policy for TeammateIdlePolicy {
    fn name(&self) -> &'static str {
        "teammate-idle"
    }

    fn guards_commands(&self) -> bool {
        false
    }

    fn evaluate(&self, event: &Event, repo: &dyn RepoInspector) -> RuleMatch {
        if !matches!(event.kind, ActionKind::IdleTransition | ActionKind::Unspecified) {
            return RuleMatch::not_applicable();
        }
        if repo.dirty_code_files().is_empty() {
            return RuleMatch::allow("no uncommitted code changes");
        }
        RuleMatch::ask(IDLE_NUDGE)
    }
}
