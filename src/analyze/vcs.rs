//! git / gh invocation shapes: subcommand lookup past global options.

use super::context::{CommandContext, contexts};

/// git global options that take their value as the next word.
const GIT_VALUE_OPTIONS: &[&str] = &["-C", "-c", "--git-dir", "--work-tree", "--namespace"];

/// gh global options that take their value as the next word.
const GH_VALUE_OPTIONS: &[&str] = &["-R", "--repo"];

/// Index of the first non-option word after `start`, skipping the values of
/// `value_options`.
fn first_operand(ctx: &CommandContext, start: usize, value_options: &[&str]) -> Option<usize> {
    let mut i = start;
    while i < ctx.words.len() {
        let word = &ctx.words[i];
        if value_options.contains(&word.as_str()) {
            i += 2;
            continue;
        }
        if word.starts_with('-') {
            i += 1;
            continue;
        }
        return Some(i);
    }
    None
}

/// Index of the git subcommand for the `git` word at `git_index`
/// (`git -C dir push` → index of `push`).
pub fn git_subcommand(ctx: &CommandContext, git_index: usize) -> Option<usize> {
    first_operand(ctx, git_index + 1, GIT_VALUE_OPTIONS)
}

/// Every `git <subcommand>` in command position across the command line.
/// Yields each segment together with the index of the subcommand word.
pub fn git_invocations(
    command: &str,
    subcommand: &str,
    wrappers: &[String],
) -> Vec<(CommandContext, usize)> {
    let git = ["git".to_string()];
    let mut found = Vec::new();
    for ctx in contexts(command) {
        let subs: Vec<usize> = ctx
            .invocations_of(&git, wrappers)
            .into_iter()
            .filter_map(|i| git_subcommand(&ctx, i))
            .filter(|&s| ctx.words[s] == subcommand)
            .collect();
        if let Some(&sub) = subs.first() {
            found.push((ctx, sub));
        }
    }
    found
}

/// True when the command line runs `git commit`.
pub fn invokes_git_commit(command: &str, wrappers: &[String]) -> bool {
    !git_invocations(command, "commit", wrappers).is_empty()
}

/// True when the command line runs `gh pr create`.
pub fn invokes_pr_create(command: &str, wrappers: &[String]) -> bool {
    let gh = ["gh".to_string()];
    contexts(command).iter().any(|ctx| {
        ctx.invocations_of(&gh, wrappers).into_iter().any(|i| {
            let Some(group) = first_operand(ctx, i + 1, GH_VALUE_OPTIONS) else {
                return false;
            };
            ctx.words[group] == "pr"
                && first_operand(ctx, group + 1, GH_VALUE_OPTIONS)
                    .is_some_and(|verb| ctx.words[verb] == "create")
        })
    })
}
