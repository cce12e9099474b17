//! Policy evaluators: one per governed operation class.
//!
//! Each policy composes command analysis and repository state into a single
//! [`RuleMatch`]. A policy that does not apply to an event allows it.

/// `git commit` on a protected branch, optional message approval.
pub mod commit;
/// Task-completion and idle checks for uncommitted code.
pub mod completion;
/// Deletions outside a git working tree.
pub mod deletion;
/// `terraform apply` / `destroy`.
pub mod infra;
/// Installs that add a dependency.
pub mod install;
/// `gh pr create` approval gate.
pub mod pr;
/// `git push` to a protected branch.
pub mod push;

use crate::eval::RuleMatch;
use crate::event::Event;
use crate::repo::RepoInspector;

/// Trait for guardrail policies.
///
/// Policies are stateless between calls; everything they need is in the
/// event, the repository inspector, or the configuration captured when the
/// policy was built.
pub trait Policy: Send + Sync {
    /// Evaluator name used on the command line (`pre-push`).
    fn name(&self) -> &'static str;

    /// Whether the policy guards shell commands, and so takes part in
    /// `pre-tool-use` aggregation.
    fn guards_commands(&self) -> bool {
        true
    }

    fn evaluate(&self, event: &Event, repo: &dyn RepoInspector) -> RuleMatch;
}

/// Non-empty command text of a command event.
pub(crate) fn command_of(event: &Event) -> Option<&str> {
    event.command_text().filter(|c| !c.trim().is_empty())
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::event::Event;

    pub fn bash(command: &str) -> Event {
        let payload = serde_json::json!({
            "tool_name": "Bash",
            "tool_input": { "command": command },
        });
        Event::parse(&payload.to_string()).unwrap()
    }

    pub fn lifecycle(hook_event_name: &str) -> Event {
        let payload = serde_json::json!({ "hook_event_name": hook_event_name });
        Event::parse(&payload.to_string()).unwrap()
    }
}
