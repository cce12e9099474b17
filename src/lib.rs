//! cc-guardrails: policy hooks for an autonomous coding agent.
//!
//! The host runtime pipes each pending action (a shell command, a file
//! write, a task completion, an idle transition) to a named evaluator, which
//! answers with one of three decisions: [`eval::Decision::Allow`],
//! [`eval::Decision::Ask`] or [`eval::Decision::Block`].
//!
//! # Architecture
//!
//! - **[`event`]**: hook payload parsing and action-kind derivation.
//! - **[`parse`]**: quote-aware compound splitting, substitution extraction, shlex tokenizing.
//! - **[`analyze`]**: facts from command text (deletion targets, push destination, ...).
//! - **[`repo`]**: current branch, dirty code files, working-tree containment.
//! - **[`policies`]**: one evaluator per governed operation.
//! - **[`eval`]**: decision types and the policy registry.
//! - **[`render`]**: exit code and output for a decision.
//! - **[`config`]**: embedded defaults + user overlay merge.
//! - **[`logging`]**: decision log at `~/.local/share/cc-guardrails/decisions.log`.

/// Command Text Analyzer.
pub mod analyze;
/// Configuration types, loading, and overlay merge logic.
pub mod config;
/// Crate error types.
pub mod error;
/// Decision types and the evaluator registry.
pub mod eval;
/// Hook payload model.
pub mod event;
/// File-based decision logging.
pub mod logging;
/// Shell command splitting and tokenizing.
pub mod parse;
/// Guardrail policies.
pub mod policies;
/// Decision Renderer.
pub mod render;
/// Repository State Inspector.
pub mod repo;

use error::Error;
use eval::RuleMatch;
use event::Event;
use repo::RepoInspector;

/// Build the registry from default config and run one evaluator.
///
/// This is the main entry point for tests and simple usage.
/// The binary builds the registry from the user's merged config instead.
pub fn evaluate(name: &str, event: &Event, repo: &dyn RepoInspector) -> Result<RuleMatch, Error> {
    let config = config::Config::default_config();
    eval::PolicyRegistry::from_config(&config).evaluate(name, event, repo)
}
