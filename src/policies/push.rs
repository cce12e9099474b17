use super::commit::display_branch;
use super::{Policy, command_of};
use crate::analyze::push;
use crate::config::{BranchConfig, Config};
use crate::eval::RuleMatch;
use crate::event::Event;
use crate::repo::RepoInspector;

pub struct PushPolicy {
    branches: BranchConfig,
    wrappers: Vec<String>,
}

impl PushPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            branches: config.branches.clone(),
            wrappers: config.wrappers.commands.clone(),
        }
    }
}

fn confirm_push(target: &str, current: &str) -> String {
    format!(
        "You're pushing to {target}. Is this intended, or should I push to a different branch?\n\n\
         Target branch: {target}\n\
         Current branch: {}",
        display_branch(current)
    )
}

impl Policy for PushPolicy {
    fn name(&self) -> &'static str {
        "pre-push"
    }

    fn evaluate(&self, event: &Event, repo: &dyn RepoInspector) -> RuleMatch {
        let Some(command) = command_of(event) else {
            return RuleMatch::not_applicable();
        };
        if !push::is_push(command, &self.wrappers) {
            return RuleMatch::not_applicable();
        }
        let analysis = push::analyze(command, &self.branches, &self.wrappers);
        if analysis.is_empty() {
            return RuleMatch::allow("push to an explicit unprotected destination");
        }

        let current = repo.current_branch();
        if let Some(target) = &analysis.explicit_protected {
            return RuleMatch::ask(confirm_push(target, &current));
        }
        if analysis.targets_current_branch && self.branches.is_protected(&current) {
            return RuleMatch::ask(confirm_push(&current, &current));
        }
        RuleMatch::allow(format!("push from {}", display_branch(&current)))
    }
}
