use super::{Policy, command_of};
use crate::analyze::install::dependency_addition;
use crate::config::{Config, InstallManager};
use crate::eval::RuleMatch;
use crate::event::Event;
use crate::repo::RepoInspector;

const NEW_DEPENDENCY: &str = "This command adds a new dependency to the project.\n\
     Verify the package is intended before proceeding.";

pub struct InstallPolicy {
    managers: Vec<InstallManager>,
}

impl InstallPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            managers: config.install.managers.clone(),
        }
    }
}

impl Policy for InstallPolicy {
    fn name(&self) -> &'static str {
        "pre-install"
    }

    fn evaluate(&self, event: &Event, _repo: &dyn RepoInspector) -> RuleMatch {
        let Some(command) = command_of(event) else {
            return RuleMatch::not_applicable();
        };
        match dependency_addition(command, &self.managers) {
            Some(hit) => {
                log::debug!("{} adds {}", hit.manager, hit.package);
                RuleMatch::ask(NEW_DEPENDENCY)
            }
            None => RuleMatch::not_applicable(),
        }
    }
}
