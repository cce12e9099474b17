use std::sync::LazyLock;

use regex::Regex;

use crate::parse;

/// Numeric wrapper arguments: `timeout 5s`, `timeout 1.5m`, `nice 10`.
static WRAPPER_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+)?[smhdkKMG]?$").expect("valid regex"));

/// Context for analysing a single simple command (one segment of a
/// compound command line).
#[derive(Debug)]
pub struct CommandContext {
    /// The segment text as it appeared after compound splitting.
    pub raw: String,
    /// All words in the segment (tokenized via shlex).
    pub words: Vec<String>,
}

impl CommandContext {
    /// Build a CommandContext from a raw segment string.
    pub fn from_command(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            words: parse::tokenize(raw),
        }
    }

    /// The base command name (basename, leading assignments skipped).
    pub fn base_command(&self) -> &str {
        parse::base_command(&self.words)
            .map(|i| parse::basename(&self.words[i]))
            .unwrap_or("")
    }

    /// Basename of the word at `index`, or `""` past the end.
    pub fn name_at(&self, index: usize) -> &str {
        self.words
            .get(index)
            .map(|w| parse::basename(w))
            .unwrap_or("")
    }

    /// Indices of every word standing in command position.
    ///
    /// That is the base command, the command run by a wrapper
    /// (`sudo rm`, `xargs -0 rm`, `env FOO=1 git push`) and the command after
    /// `find ... -exec`. After a wrapper, a word following a short flag may be
    /// the flag's value or the wrapped command; both are reported.
    pub fn command_positions(&self, wrappers: &[String]) -> Vec<usize> {
        let mut positions = Vec::new();
        let mut expect_command = true;
        let mut in_wrapper = false;
        let mut after_short_flag = false;

        for (i, word) in self.words.iter().enumerate() {
            if !expect_command {
                if matches!(word.as_str(), "-exec" | "-execdir" | "-ok" | "-okdir") {
                    expect_command = true;
                    in_wrapper = false;
                    after_short_flag = false;
                }
                continue;
            }
            if parse::is_assignment(word) {
                continue;
            }
            if in_wrapper && word.starts_with('-') {
                after_short_flag = word.len() == 2;
                continue;
            }
            if in_wrapper && WRAPPER_VALUE.is_match(word) {
                after_short_flag = false;
                continue;
            }

            positions.push(i);
            let is_wrapper = wrappers.iter().any(|w| w == parse::basename(word));
            let ambiguous = in_wrapper && after_short_flag;
            in_wrapper = is_wrapper || ambiguous;
            expect_command = in_wrapper;
            after_short_flag = false;
        }

        positions
    }

    /// Command positions whose basename is one of `names`.
    pub fn invocations_of(&self, names: &[String], wrappers: &[String]) -> Vec<usize> {
        self.command_positions(wrappers)
            .into_iter()
            .filter(|&i| names.iter().any(|n| n == self.name_at(i)))
            .collect()
    }
}

/// Split a full command line into per-segment contexts, substitutions
/// included.
pub fn contexts(command: &str) -> Vec<CommandContext> {
    parse::segments(command)
        .iter()
        .map(|segment| CommandContext::from_command(segment))
        .collect()
}
