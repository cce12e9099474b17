//! Targets of file-removal commands (`rm`, `rmdir`, `unlink`, `git rm`).

use super::context::{CommandContext, contexts};
use super::vcs::git_subcommand;
use crate::parse::{self, SUBST_PLACEHOLDER};

/// Result of scanning a command line for deletions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionScan {
    /// Some removal primitive is present.
    pub primitive_found: bool,
    /// Candidate paths, in order of appearance, flags and quoting stripped.
    pub targets: Vec<String>,
}

/// True when a target came from a command substitution and cannot be
/// known without running it.
pub fn is_substituted(target: &str) -> bool {
    target.contains(SUBST_PLACEHOLDER)
}

/// Arguments after the primitive at `index`: option flags are dropped until
/// `--`; redirections and their operands, `find -exec` terminators and `{}`
/// are not paths.
fn targets_after(ctx: &CommandContext, index: usize) -> Vec<String> {
    let mut targets = Vec::new();
    let mut options_done = false;
    let mut i = index + 1;
    while i < ctx.words.len() {
        let word = &ctx.words[i];
        if word == ";" || word == "+" {
            break;
        }
        if let Some(span) = parse::redirection_span(word) {
            i += span;
            continue;
        }
        i += 1;
        if !options_done && word == "--" {
            options_done = true;
            continue;
        }
        if (!options_done && word.starts_with('-')) || word == "{}" {
            continue;
        }
        targets.push(word.clone());
    }
    targets
}

/// Scan every segment for removal primitives in command position and
/// collect their path arguments.
///
/// Chains like `cmd > /dev/null && rm` need no special case: the `rm`
/// segment is found in command position even when it has no arguments.
pub fn deletion_targets(command: &str, primitives: &[String], wrappers: &[String]) -> DeletionScan {
    let mut scan = DeletionScan::default();

    for ctx in contexts(command) {
        for position in ctx.command_positions(wrappers) {
            let name = ctx.name_at(position);
            let primitive_at = if primitives.iter().any(|p| p == name) {
                Some(position)
            } else if name == "git" {
                git_subcommand(&ctx, position).filter(|&s| ctx.words[s] == "rm")
            } else {
                None
            };
            if let Some(index) = primitive_at {
                scan.primitive_found = true;
                scan.targets.extend(targets_after(&ctx, index));
            }
        }
    }

    scan
}
