//! Command Text Analyzer: facts extracted from a raw command line without
//! running it.
//!
//! Every analysis works on the segments produced by [`crate::parse`], so
//! `cd x && git push` and `echo $(rm -rf y)` are seen for what they run.
//! Matching is token-level and best-effort; an exotic shell construct may
//! slip through, but nothing here panics on malformed input.

/// Per-segment word view and command-position detection.
pub mod context;
/// `rm` / `rmdir` / `unlink` / `git rm` targets.
pub mod deletion;
/// `terraform apply` / `destroy` and friends.
pub mod infra;
/// Package installs that add a new dependency.
pub mod install;
/// `git push` destination analysis.
pub mod push;
/// git / gh subcommand lookup (`git commit`, `gh pr create`).
pub mod vcs;

pub use context::{CommandContext, contexts};
