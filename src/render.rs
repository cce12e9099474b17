//! Decision Renderer: the host-facing signal for a [`RuleMatch`].
//!
//! Allow is silence with exit 0. Block is exit 2 with the reason on stderr,
//! which the host feeds back to the agent. Ask is exit 0 with a
//! `hookSpecificOutput` JSON payload on stdout asking the user to confirm.

use crate::eval::{Decision, RuleMatch};

pub const EXIT_ALLOW: i32 = 0;
pub const EXIT_BLOCK: i32 = 2;
/// Internal fault, distinct from a decision.
pub const EXIT_ERROR: i32 = 1;

/// Event name reported when the payload did not carry one.
const DEFAULT_HOOK_EVENT: &str = "PreToolUse";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendering {
    pub exit_code: i32,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
}

pub fn render(result: &RuleMatch, hook_event_name: Option<&str>) -> Rendering {
    match result.decision {
        Decision::Allow => Rendering {
            exit_code: EXIT_ALLOW,
            stdout: None,
            stderr: None,
        },
        Decision::Block => Rendering {
            exit_code: EXIT_BLOCK,
            stdout: None,
            stderr: Some(result.reason.clone()),
        },
        Decision::Ask => {
            let output = serde_json::json!({
                "hookSpecificOutput": {
                    "hookEventName": hook_event_name.unwrap_or(DEFAULT_HOOK_EVENT),
                    "permissionDecision": result.decision.as_str(),
                    "permissionDecisionReason": result.reason,
                }
            });
            Rendering {
                exit_code: EXIT_ALLOW,
                stdout: Some(output.to_string()),
                stderr: None,
            }
        }
    }
}
