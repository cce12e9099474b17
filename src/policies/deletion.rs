use super::{Policy, command_of};
use crate::analyze::deletion::{deletion_targets, is_substituted};
use crate::config::{Config, DeletionConfig, DeletionMode};
use crate::eval::RuleMatch;
use crate::event::Event;
use crate::repo::RepoInspector;

pub struct DeletionPolicy {
    deletion: DeletionConfig,
    wrappers: Vec<String>,
}

impl DeletionPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            deletion: config.deletion.clone(),
            wrappers: config.wrappers.commands.clone(),
        }
    }

    fn allowed(&self, target: &str, repo: &dyn RepoInspector) -> bool {
        match self.deletion.mode {
            DeletionMode::TrackedTree => repo.path_is_inside_tracked_tree(target),
            DeletionMode::AllowedRoot => repo.path_is_inside_root(target, &self.deletion.allowed_root),
        }
    }

    fn rule(&self) -> String {
        match self.deletion.mode {
            DeletionMode::TrackedTree => {
                "Deletions are only allowed within git-managed directories.".into()
            }
            DeletionMode::AllowedRoot if self.deletion.allowed_root.is_empty() => {
                "Deletions are only allowed under `deletion.allowed_root`, which is not set.".into()
            }
            DeletionMode::AllowedRoot => format!(
                "Deletions are only allowed under {}.",
                self.deletion.allowed_root
            ),
        }
    }

    fn outside(&self) -> &'static str {
        match self.deletion.mode {
            DeletionMode::TrackedTree => "outside any git repository",
            DeletionMode::AllowedRoot => "outside the allowed root",
        }
    }
}

impl Policy for DeletionPolicy {
    fn name(&self) -> &'static str {
        "protect-files"
    }

    fn evaluate(&self, event: &Event, repo: &dyn RepoInspector) -> RuleMatch {
        let Some(command) = command_of(event) else {
            return RuleMatch::not_applicable();
        };
        let scan = deletion_targets(command, &self.deletion.primitives, &self.wrappers);
        if !scan.primitive_found {
            return RuleMatch::not_applicable();
        }
        if scan.targets.is_empty() {
            return RuleMatch::ask(format!(
                "This command deletes files, but its targets could not be determined.\n{}",
                self.rule()
            ));
        }

        for target in &scan.targets {
            if is_substituted(target) {
                return RuleMatch::ask(format!(
                    "This command deletes a path produced by a command substitution, \
                     so its targets could not be determined.\n{}",
                    self.rule()
                ));
            }
            if !self.allowed(target, repo) {
                return RuleMatch::ask(format!(
                    "This command will delete files {}: {target}\n{}",
                    self.outside(),
                    self.rule()
                ));
            }
        }
        RuleMatch::allow(format!("{} deletion target(s) allowed", scan.targets.len()))
    }
}
