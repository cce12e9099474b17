//! Destination analysis for `git push`.

use super::context::CommandContext;
use super::vcs::git_invocations;
use crate::config::BranchConfig;

/// `git push` options that take their value as the next word.
const PUSH_VALUE_OPTIONS: &[&str] = &["-o", "--push-option", "--repo", "--receive-pack", "--exec"];

/// What a `git push` command line says about its destination.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PushAnalysis {
    /// A protected branch named explicitly (bare word or refspec destination).
    pub explicit_protected: Option<String>,
    /// Some push resolves to whatever branch is checked out.
    pub targets_current_branch: bool,
}

impl PushAnalysis {
    /// Nothing in the command line can land on a protected branch
    /// without further knowledge of the current branch.
    pub fn is_empty(&self) -> bool {
        self.explicit_protected.is_none() && !self.targets_current_branch
    }
}

/// Strip force marker and `refs/heads/` so `+refs/heads/main` compares as `main`.
fn branch_name(reference: &str) -> &str {
    let reference = reference.strip_prefix('+').unwrap_or(reference);
    reference.strip_prefix("refs/heads/").unwrap_or(reference)
}

/// Positional words after `push`, with options and their values dropped.
fn positionals(ctx: &CommandContext, push_index: usize) -> Vec<&str> {
    let mut out = Vec::new();
    let mut i = push_index + 1;
    let mut options_done = false;
    while i < ctx.words.len() {
        let word = ctx.words[i].as_str();
        if !options_done {
            if word == "--" {
                options_done = true;
                i += 1;
                continue;
            }
            if PUSH_VALUE_OPTIONS.contains(&word) {
                i += 2;
                continue;
            }
            if word.starts_with('-') {
                i += 1;
                continue;
            }
        }
        out.push(word);
        i += 1;
    }
    out
}

fn analyze_one(ctx: &CommandContext, push_index: usize, branches: &BranchConfig) -> PushAnalysis {
    let mut analysis = PushAnalysis::default();

    // A protected name anywhere among the words wins outright.
    if let Some(name) = ctx.words[push_index + 1..]
        .iter()
        .find(|w| branches.is_protected(w))
    {
        analysis.explicit_protected = Some(name.clone());
        return analysis;
    }

    let positional = positionals(ctx, push_index);

    // Refspec destinations: `src:dst`, `+dst`, `refs/heads/dst`.
    for refspec in positional.iter().skip(1) {
        let destination = refspec.rsplit_once(':').map_or(*refspec, |(_, dst)| dst);
        let destination = branch_name(destination);
        if branches.is_protected(destination) {
            analysis.explicit_protected = Some(destination.to_string());
            return analysis;
        }
    }

    // positional[0] = remote, positional[1] = refspec
    analysis.targets_current_branch = match positional.get(1) {
        None => true,
        Some(&refspec) => refspec == "HEAD" || !refspec.contains(':'),
    };
    analysis
}

/// Analyse every `git push` in the command line and merge the results:
/// the first explicit protected destination wins, and any push that
/// resolves to the current branch marks the whole line.
pub fn analyze(command: &str, branches: &BranchConfig, wrappers: &[String]) -> PushAnalysis {
    let mut merged = PushAnalysis::default();
    for (ctx, push_index) in git_invocations(command, "push", wrappers) {
        let one = analyze_one(&ctx, push_index, branches);
        if merged.explicit_protected.is_none() {
            merged.explicit_protected = one.explicit_protected;
        }
        merged.targets_current_branch |= one.targets_current_branch;
    }
    merged
}

/// True when the command line contains a `git push`.
pub fn is_push(command: &str, wrappers: &[String]) -> bool {
    !git_invocations(command, "push", wrappers).is_empty()
}
