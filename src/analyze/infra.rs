//! Destructive subcommands of infrastructure tools (`terraform apply`).

use super::context::contexts;
use crate::config::InfraConfig;

/// A destructive infra invocation, reported verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestructiveInfra {
    pub tool: String,
    pub subcommand: String,
}

/// First destructive subcommand of any configured infra tool in the
/// command line. Every word after the tool is checked, so
/// `terraform -chdir=env/prod apply` matches too.
pub fn destructive_subcommand(
    command: &str,
    infra: &InfraConfig,
    wrappers: &[String],
) -> Option<DestructiveInfra> {
    for ctx in contexts(command) {
        for tool_index in ctx.invocations_of(&infra.tools, wrappers) {
            let hit = ctx.words[tool_index + 1..]
                .iter()
                .find(|w| infra.destructive_subcommands.contains(w));
            if let Some(subcommand) = hit {
                return Some(DestructiveInfra {
                    tool: ctx.name_at(tool_index).to_string(),
                    subcommand: subcommand.clone(),
                });
            }
        }
    }
    None
}

/// True when the command line runs any configured infra tool.
pub fn invokes_infra_tool(command: &str, infra: &InfraConfig, wrappers: &[String]) -> bool {
    contexts(command)
        .iter()
        .any(|ctx| !ctx.invocations_of(&infra.tools, wrappers).is_empty())
}
