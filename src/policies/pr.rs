use super::{Policy, command_of};
use crate::analyze::vcs::invokes_pr_create;
use crate::config::Config;
use crate::eval::RuleMatch;
use crate::event::Event;
use crate::repo::RepoInspector;

const PR_APPROVAL: &str = "BLOCKED: PR creation requires approval.\n\n\
     Before creating the PR, you MUST:\n\
     1. Use the `pr-description` agent to generate the PR title and description\n\
     2. Present the FULL PR title and description to the user\n\
     3. Wait for explicit user approval\n\
     4. Only after approval, retry the gh pr create command";

pub struct PrPolicy {
    wrappers: Vec<String>,
}

impl PrPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            wrappers: config.wrappers.commands.clone(),
        }
    }
}

impl Policy for PrPolicy {
    fn name(&self) -> &'static str {
        "pre-pr"
    }

    fn evaluate(&self, event: &Event, _repo: &dyn RepoInspector) -> RuleMatch {
        match command_of(event) {
            Some(command) if invokes_pr_create(command, &self.wrappers) => {
                RuleMatch::block(PR_APPROVAL)
            }
            _ => RuleMatch::not_applicable(),
        }
    }
}
