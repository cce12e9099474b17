//! The pending agent action, as delivered by the host on stdin.

use std::path::PathBuf;

use serde::Deserialize;

/// Tools whose action is writing a file.
const FILE_WRITE_TOOLS: &[&str] = &["Write", "Edit", "MultiEdit", "NotebookEdit"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    CommandExecution,
    FileWrite,
    TaskCompletion,
    IdleTransition,
    /// The payload carries no discriminator at all.
    Unspecified,
    /// A tool this crate does not govern.
    Other(String),
}

/// Wire shape of a hook payload. Unknown fields are ignored.
#[derive(Deserialize)]
struct HookInput {
    tool_name: Option<String>,
    tool_input: Option<ToolInput>,
    hook_event_name: Option<String>,
    cwd: Option<PathBuf>,
}

#[derive(Deserialize)]
struct ToolInput {
    command: Option<String>,
    #[serde(alias = "notebook_path")]
    file_path: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Event {
    pub kind: ActionKind,
    pub command: Option<String>,
    pub file_path: Option<String>,
    /// Echoed back in the advisory payload.
    pub hook_event_name: Option<String>,
    /// Working directory reported by the host.
    pub cwd: Option<PathBuf>,
    pub raw: serde_json::Value,
}

impl Event {
    /// Parse a hook payload. `None` for empty input, invalid JSON, or JSON
    /// that is not a hook object: there is nothing to evaluate.
    pub fn parse(input: &str) -> Option<Event> {
        if input.trim().is_empty() {
            return None;
        }
        let raw: serde_json::Value = match serde_json::from_str(input) {
            Ok(v) => v,
            Err(e) => {
                log::debug!("ignoring unparseable hook input: {e}");
                return None;
            }
        };
        if !raw.is_object() {
            return None;
        }
        let hook: HookInput = match serde_json::from_value(raw.clone()) {
            Ok(h) => h,
            Err(e) => {
                log::debug!("ignoring malformed hook input: {e}");
                return None;
            }
        };

        let (command, file_path) = hook
            .tool_input
            .map(|t| (t.command, t.file_path))
            .unwrap_or_default();
        let kind = action_kind(
            hook.hook_event_name.as_deref(),
            hook.tool_name.as_deref(),
            command.is_some(),
            file_path.is_some(),
        );

        Some(Event {
            kind,
            command,
            file_path,
            hook_event_name: hook.hook_event_name,
            cwd: hook.cwd,
            raw,
        })
    }

    /// Command text for command events, `None` otherwise.
    pub fn command_text(&self) -> Option<&str> {
        match self.kind {
            ActionKind::CommandExecution => self.command.as_deref(),
            _ => None,
        }
    }
}

fn action_kind(
    hook_event: Option<&str>,
    tool_name: Option<&str>,
    has_command: bool,
    has_file_path: bool,
) -> ActionKind {
    match (hook_event, tool_name) {
        (Some("TaskCompleted"), _) => ActionKind::TaskCompletion,
        (Some("TeammateIdle"), _) => ActionKind::IdleTransition,
        (_, Some("Bash")) => ActionKind::CommandExecution,
        (_, Some(tool)) if FILE_WRITE_TOOLS.contains(&tool) => ActionKind::FileWrite,
        (_, Some(tool)) => ActionKind::Other(tool.to_string()),
        (_, None) if has_command => ActionKind::CommandExecution,
        (_, None) if has_file_path => ActionKind::FileWrite,
        _ => ActionKind::Unspecified,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(json: &str) -> ActionKind {
        Event::parse(json).unwrap().kind
    }

    #[test]
    fn bash_command() {
        let event =
            Event::parse(r#"{"tool_name":"Bash","tool_input":{"command":"git push"}}"#).unwrap();
        assert_eq!(event.kind, ActionKind::CommandExecution);
        assert_eq!(event.command_text(), Some("git push"));
        assert!(event.hook_event_name.is_none());
    }

    #[test]
    fn file_write_tools() {
        assert_eq!(
            kind(r#"{"tool_name":"Write","tool_input":{"file_path":"a.rs"}}"#),
            ActionKind::FileWrite
        );
        assert_eq!(kind(r#"{"tool_name":"MultiEdit"}"#), ActionKind::FileWrite);
        let nb = Event::parse(r#"{"tool_name":"NotebookEdit","tool_input":{"notebook_path":"n.ipynb"}}"#)
            .unwrap();
        assert_eq!(nb.file_path.as_deref(), Some("n.ipynb"));
    }

    #[test]
    fn other_tool() {
        assert_eq!(
            kind(r#"{"tool_name":"Read","tool_input":{"file_path":"x"}}"#),
            ActionKind::Other("Read".into())
        );
    }

    #[test]
    fn lifecycle_events() {
        assert_eq!(
            kind(r#"{"hook_event_name":"TaskCompleted"}"#),
            ActionKind::TaskCompletion
        );
        assert_eq!(
            kind(r#"{"hook_event_name":"TeammateIdle","cwd":"/w"}"#),
            ActionKind::IdleTransition
        );
    }

    #[test]
    fn inferred_from_tool_input() {
        assert_eq!(
            kind(r#"{"tool_input":{"command":"ls"}}"#),
            ActionKind::CommandExecution
        );
        assert_eq!(
            kind(r#"{"tool_input":{"file_path":"a"}}"#),
            ActionKind::FileWrite
        );
    }

    #[test]
    fn no_discriminator() {
        assert_eq!(kind("{}"), ActionKind::Unspecified);
        assert_eq!(kind(r#"{"session_id":"abc"}"#), ActionKind::Unspecified);
    }

    #[test]
    fn command_text_only_for_commands() {
        let event =
            Event::parse(r#"{"tool_name":"Write","tool_input":{"command":"rm -rf /"}}"#).unwrap();
        assert_eq!(event.command_text(), None);
    }

    #[test]
    fn cwd_and_event_name_kept() {
        let event = Event::parse(
            r#"{"hook_event_name":"PreToolUse","cwd":"/work","tool_name":"Bash","tool_input":{"command":"ls"}}"#,
        )
        .unwrap();
        assert_eq!(event.hook_event_name.as_deref(), Some("PreToolUse"));
        assert_eq!(event.cwd, Some(PathBuf::from("/work")));
        assert_eq!(event.raw["tool_name"], "Bash");
    }

    #[test]
    fn unusable_input() {
        assert!(Event::parse("").is_none());
        assert!(Event::parse("   \n").is_none());
        assert!(Event::parse("not json").is_none());
        assert!(Event::parse("[1,2]").is_none());
        assert!(Event::parse(r#"{"tool_name":42}"#).is_none());
    }
}
