use super::{Policy, command_of};
use crate::analyze::vcs::invokes_git_commit;
use crate::config::{BranchConfig, Config};
use crate::eval::RuleMatch;
use crate::event::Event;
use crate::repo::RepoInspector;

pub struct CommitPolicy {
    protected: BranchConfig,
    wrappers: Vec<String>,
    require_approval: bool,
}

impl CommitPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            protected: config.branches.clone(),
            wrappers: config.wrappers.commands.clone(),
            require_approval: config.commit.require_approval,
        }
    }
}

fn protected_branch_message(branch: &str) -> String {
    format!(
        "BLOCKED: You are on the {branch} branch.\n\n\
         Before committing, you MUST:\n\
         1. Ask the user: 'You're on {branch}. Should I create a new branch for this commit?'\n\
         2. If yes, create the branch and switch to it\n\
         3. Then retry the commit"
    )
}

const APPROVAL_MESSAGE: &str = "BLOCKED: Commit requires approval.\n\n\
     Before committing, you MUST:\n\
     1. Draft the commit message\n\
     2. Present the FULL commit message to the user\n\
     3. Wait for explicit user approval\n\
     4. Only after approval, retry the git commit command";

impl Policy for CommitPolicy {
    fn name(&self) -> &'static str {
        "pre-commit"
    }

    fn evaluate(&self, event: &Event, repo: &dyn RepoInspector) -> RuleMatch {
        let Some(command) = command_of(event) else {
            return RuleMatch::not_applicable();
        };
        if !invokes_git_commit(command, &self.wrappers) {
            return RuleMatch::not_applicable();
        }

        let branch = repo.current_branch();
        if self.protected.is_protected(&branch) {
            return RuleMatch::block(protected_branch_message(&branch));
        }
        if self.require_approval {
            return RuleMatch::block(APPROVAL_MESSAGE);
        }
        RuleMatch::allow(format!("commit on {}", display_branch(&branch)))
    }
}

pub(crate) fn display_branch(branch: &str) -> &str {
    if branch.is_empty() { "unknown branch" } else { branch }
}
