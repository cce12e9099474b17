pub mod decision;

pub use decision::{Decision, RuleMatch};

use crate::config::Config;
use crate::error::Error;
use crate::event::{ActionKind, Event};
use crate::policies::Policy;
use crate::repo::RepoInspector;

/// Evaluator that runs every command policy and keeps the most restrictive
/// result.
pub const PRE_TOOL_USE: &str = "pre-tool-use";

/// Registry of all policies, in evaluation order.
pub struct PolicyRegistry {
    policies: Vec<Box<dyn Policy>>,
}

impl PolicyRegistry {
    /// Build the registry from configuration.
    pub fn from_config(config: &Config) -> Self {
        use crate::policies::{
            commit::CommitPolicy,
            completion::{TaskCompletedPolicy, TeammateIdlePolicy},
            deletion::DeletionPolicy,
            infra::InfraPolicy,
            install::InstallPolicy,
            pr::PrPolicy,
            push::PushPolicy,
        };

        let policies: Vec<Box<dyn Policy>> = vec![
            Box::new(CommitPolicy::from_config(config)),
            Box::new(PushPolicy::from_config(config)),
            Box::new(InfraPolicy::from_config(config)),
            Box::new(InstallPolicy::from_config(config)),
            Box::new(DeletionPolicy::from_config(config)),
            Box::new(PrPolicy::from_config(config)),
            Box::new(TaskCompletedPolicy::from_config(config)),
            Box::new(TeammateIdlePolicy),
        ];
        Self { policies }
    }

    /// Every evaluator name accepted by [`evaluate`](Self::evaluate).
    pub fn names(&self) -> Vec<&'static str> {
        self.policies
            .iter()
            .map(|p| p.name())
            .chain(std::iter::once(PRE_TOOL_USE))
            .collect()
    }

    fn get(&self, name: &str) -> Option<&dyn Policy> {
        self.policies
            .iter()
            .find(|p| p.name() == name)
            .map(|b| b.as_ref())
    }

    /// Run the named evaluator against one event.
    pub fn evaluate(
        &self,
        name: &str,
        event: &Event,
        repo: &dyn RepoInspector,
    ) -> Result<RuleMatch, Error> {
        if name == PRE_TOOL_USE {
            return Ok(self.evaluate_commands(event, repo));
        }
        self.get(name)
            .map(|policy| policy.evaluate(event, repo))
            .ok_or_else(|| Error::UnknownEvaluator(name.to_string()))
    }

    /// Most restrictive result of every command policy. Ties keep the
    /// earlier policy's result.
    fn evaluate_commands(&self, event: &Event, repo: &dyn RepoInspector) -> RuleMatch {
        if event.kind != ActionKind::CommandExecution {
            return RuleMatch::not_applicable();
        }

        let mut worst: Option<RuleMatch> = None;
        for policy in self.policies.iter().filter(|p| p.guards_commands()) {
            let result = policy.evaluate(event, repo);
            log::debug!("{} -> {}", policy.name(), result.decision.label());
            if worst.as_ref().is_none_or(|w| result.decision > w.decision) {
                worst = Some(result);
            }
        }

        match worst {
            Some(result) if result.decision != Decision::Allow => result,
            _ => RuleMatch::allow("no guardrail applies"),
        }
    }
}
