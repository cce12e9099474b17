use std::sync::LazyLock;

use regex::Regex;

/// Optional fd or `&`, a redirection operator, then any glued operand.
static REDIRECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d+|&)?(?:<<<|<<-|<<|>>|>\||>&|<&|<>|>|<)(.*)$").expect("valid regex")
});

/// Tokenize a command segment into words using shlex (POSIX word splitting).
pub fn tokenize(command: &str) -> Vec<String> {
    shlex::split(command).unwrap_or_else(|| {
        // Fallback: simple whitespace splitting if shlex can't parse
        command.split_whitespace().map(String::from).collect()
    })
}

/// `KEY=value` shell assignment prefix (`FOO=1 cmd`).
pub fn is_assignment(word: &str) -> bool {
    let Some((key, _)) = word.split_once('=') else {
        return false;
    };
    !key.is_empty()
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && key
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
}

/// Strip a leading directory: `/usr/bin/rm` → `rm`, `./script.sh` → `script.sh`.
pub fn basename(word: &str) -> &str {
    match word.rsplit_once('/') {
        Some((_, name)) if !name.is_empty() => name,
        _ => word,
    }
}

/// Number of words a redirection starting at `word` spans: 1 when the
/// operand is glued on (`>/dev/null`, `2>&1`), 2 when it is the next word
/// (`> out.log`, `2>> err`). `None` when `word` is not a redirection.
pub fn redirection_span(word: &str) -> Option<usize> {
    let caps = REDIRECTION.captures(word)?;
    let glued = caps.get(1).is_some_and(|operand| !operand.as_str().is_empty());
    Some(if glued { 1 } else { 2 })
}

/// Index of the first real command word, skipping leading assignments.
pub fn base_command(words: &[String]) -> Option<usize> {
    words.iter().position(|w| !is_assignment(w))
}
