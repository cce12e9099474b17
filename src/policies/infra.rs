use super::{Policy, command_of};
use crate::analyze::infra::{destructive_subcommand, invokes_infra_tool};
use crate::config::{Config, InfraConfig};
use crate::eval::RuleMatch;
use crate::event::Event;
use crate::repo::RepoInspector;

pub struct InfraPolicy {
    infra: InfraConfig,
    wrappers: Vec<String>,
}

impl InfraPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            infra: config.infra.clone(),
            wrappers: config.wrappers.commands.clone(),
        }
    }
}

impl Policy for InfraPolicy {
    fn name(&self) -> &'static str {
        "pre-terraform"
    }

    fn evaluate(&self, event: &Event, _repo: &dyn RepoInspector) -> RuleMatch {
        let Some(command) = command_of(event) else {
            return RuleMatch::not_applicable();
        };
        match destructive_subcommand(command, &self.infra, &self.wrappers) {
            Some(hit) => {
                let op = format!("{} {}", hit.tool, hit.subcommand);
                RuleMatch::ask(format!(
                    "`{op}` is a destructive operation.\n\n\
                     You MUST ask the user:\n\
                     'About to run `{op}`. Have you reviewed the plan? Should I proceed?'\n\n\
                     Only proceed after explicit user confirmation."
                ))
            }
            None if invokes_infra_tool(command, &self.infra, &self.wrappers) => {
                RuleMatch::allow("non-destructive infra command")
            }
            None => RuleMatch::not_applicable(),
        }
    }
}
