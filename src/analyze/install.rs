//! Package-manager invocations that add a new dependency.
//!
//! `npm install` (from the lockfile) and `pip install -r requirements.txt`
//! do not add anything; `npm install lodash` does. The distinction is a
//! positional package argument after the install verb.

use super::context::{CommandContext, contexts};
use crate::config::InstallManager;
use crate::parse;

/// A package-manager call that names a package to add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyAddition {
    /// Manager family name from config (`npm`, `pip`, ...).
    pub manager: String,
    /// The first package argument.
    pub package: String,
}

fn is_local_path(word: &str) -> bool {
    word == "." || word == ".." || word.starts_with("./") || word.starts_with("../") || word.starts_with('/')
}

/// First package argument after the verb at `verb_index`, if any.
fn package_argument<'a>(
    ctx: &'a CommandContext,
    verb_index: usize,
    manager: &InstallManager,
) -> Option<&'a str> {
    let mut i = verb_index + 1;
    let mut options_done = false;
    while i < ctx.words.len() {
        let word = ctx.words[i].as_str();
        if !options_done && word == "--" {
            options_done = true;
            i += 1;
            continue;
        }
        if let Some(span) = parse::redirection_span(word) {
            i += span;
            continue;
        }
        if !options_done && word.starts_with('-') {
            // `-r file` consumes its value; `--requirement=file` is a single word
            i += if manager.takes_value(word) { 2 } else { 1 };
            continue;
        }
        if manager.local_paths_ignored && is_local_path(word) {
            i += 1;
            continue;
        }
        return Some(word);
    }
    None
}

fn addition_in(ctx: &CommandContext, managers: &[InstallManager]) -> Option<DependencyAddition> {
    // Any word may start the call: `python -m pip install x`, `uv pip install x`.
    for (i, word) in ctx.words.iter().enumerate() {
        let name = parse::basename(word);
        let Some(verb) = ctx.words.get(i + 1) else {
            continue;
        };
        for manager in managers {
            if !manager.commands.iter().any(|c| c == name) || !manager.verbs.contains(verb) {
                continue;
            }
            if let Some(package) = package_argument(ctx, i + 1, manager) {
                return Some(DependencyAddition {
                    manager: manager.name.clone(),
                    package: package.to_string(),
                });
            }
        }
    }
    None
}

/// First dependency-adding install in the command line.
pub fn dependency_addition(
    command: &str,
    managers: &[InstallManager],
) -> Option<DependencyAddition> {
    contexts(command)
        .iter()
        .find_map(|ctx| addition_in(ctx, managers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn run(cmd: &str) -> Option<DependencyAddition> {
        dependency_addition(cmd, &Config::default_config().install.managers)
    }

    fn adds(cmd: &str) -> bool {
        run(cmd).is_some()
    }

    #[test]
    fn npm_bare_install_is_lockfile() {
        assert!(!adds("npm install"));
        assert!(!adds("npm i"));
        assert!(!adds("npm ci"));
        assert!(!adds("npm install --frozen-lockfile"));
    }

    #[test]
    fn npm_with_package_adds() {
        let hit = run("npm install lodash").unwrap();
        assert_eq!(hit.manager, "npm");
        assert_eq!(hit.package, "lodash");
        assert!(adds("npm i -D typescript"));
        assert!(adds("npm add @types/node"));
    }

    #[test]
    fn yarn_pnpm_bun_add() {
        assert!(adds("yarn add react"));
        assert!(adds("pnpm add -w zod"));
        assert!(adds("bun add hono"));
        assert!(!adds("yarn install"));
        assert!(!adds("pnpm install"));
        assert!(!adds("bun install"));
    }

    #[test]
    fn pip_requirements_file_is_lockfile() {
        assert!(!adds("pip install -r requirements.txt"));
        assert!(!adds("pip3 install --requirement requirements-dev.txt"));
        assert!(!adds("pip install --requirement=requirements.txt"));
        assert!(!adds("pip install -e ."));
        assert!(!adds("pip install ."));
    }

    #[test]
    fn pip_with_package_adds() {
        let hit = run("pip install requests").unwrap();
        assert_eq!(hit.manager, "pip");
        assert!(adds("pip3 install --upgrade httpx"));
        assert!(adds("python -m pip install numpy"));
        assert!(adds("pip install -r requirements.txt flask"));
    }

    #[test]
    fn value_flags_consume_their_argument() {
        assert!(!adds("npm install --prefix web"));
        assert!(!adds("npm ci --prefix web"));
        assert!(!adds("pnpm install --filter web"));
        assert!(!adds("yarn add --cwd web"));
        assert!(!adds("pip install --index-url https://pypi.example/simple -r req.txt"));
        assert!(!adds("pip install -i https://pypi.example/simple -r req.txt"));
        assert!(!adds("pip install --target vendor -r req.txt"));
        assert!(!adds("uv add --project api"));
    }

    #[test]
    fn value_flag_before_package_still_adds() {
        let hit = run("npm install --prefix web lodash").unwrap();
        assert_eq!(hit.package, "lodash");
        let hit = run("pip install --index-url https://pypi.example/simple requests").unwrap();
        assert_eq!(hit.package, "requests");
        let hit = run("cargo add --features derive serde").unwrap();
        assert_eq!(hit.package, "serde");
    }

    #[test]
    fn redirection_is_not_a_package() {
        assert!(!adds("npm install > install.log 2>&1"));
        assert!(!adds("pip install -r requirements.txt >/dev/null"));
        assert!(adds("npm install lodash > install.log"));
    }

    #[test]
    fn cargo_add() {
        assert!(adds("cargo add serde --features derive"));
        assert!(!adds("cargo build"));
        assert!(!adds("cargo add"));
    }

    #[test]
    fn uv_and_poetry() {
        assert!(adds("uv add fastapi"));
        assert!(adds("poetry add pendulum"));
        assert!(adds("uv pip install rich"));
        assert!(!adds("uv sync"));
    }

    #[test]
    fn install_inside_compound() {
        assert!(adds("cd web && npm install left-pad"));
    }

    #[test]
    fn quoted_text_is_one_word() {
        assert!(!adds("echo 'npm install lodash'"));
    }
}
