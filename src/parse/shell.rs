/// Stands in for an extracted `$(...)`, backtick or `<(...)` span.
pub const SUBST_PLACEHOLDER: &str = "__SUBST__";

/// Nesting limit for recursive substitution extraction.
const MAX_SUBSTITUTION_DEPTH: usize = 8;

/// Split a command at shell separators (`&&`, `||`, `;`, `|`, `|&`, `&`,
/// newline), respecting single/double quotes, backslash escapes and
/// here-document bodies.
fn split_compound_command(command: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut buf = String::new();

    let chars: Vec<char> = command.chars().collect();
    let len = chars.len();
    let mut i = 0;
    let (mut sq, mut dq, mut esc) = (false, false, false);
    let mut heredocs: Vec<String> = Vec::new();

    while i < len {
        let c = chars[i];

        if esc {
            buf.push(c);
            esc = false;
            i += 1;
            continue;
        }
        if c == '\\' && !sq {
            esc = true;
            buf.push(c);
            i += 1;
            continue;
        }
        if c == '\'' && !dq {
            sq = !sq;
            buf.push(c);
            i += 1;
            continue;
        }
        if c == '"' && !sq {
            dq = !dq;
            buf.push(c);
            i += 1;
            continue;
        }
        if sq || dq {
            buf.push(c);
            i += 1;
            continue;
        }

        // <<< is a here-string, nothing to skip later
        if c == '<' && i + 2 < len && chars[i + 1] == '<' && chars[i + 2] == '<' {
            buf.push_str("<<<");
            i += 3;
            continue;
        }
        // << / <<- : the body starts at the next newline
        if c == '<' && i + 1 < len && chars[i + 1] == '<' {
            let (delim, next) = heredoc_delimiter(&chars, i + 2);
            buf.extend(&chars[i..next]);
            if !delim.is_empty() {
                heredocs.push(delim);
            }
            i = next;
            continue;
        }

        if c == '\n' {
            flush(&mut parts, &mut buf);
            i += 1;
            for delim in heredocs.drain(..) {
                i = skip_heredoc_body(&chars, i, &delim);
            }
            continue;
        }

        // Two-char operators
        if i + 1 < len {
            let is_op = matches!((c, chars[i + 1]), ('&', '&') | ('|', '|') | ('|', '&'));
            if is_op {
                flush(&mut parts, &mut buf);
                i += 2;
                continue;
            }
        }

        match c {
            '|' | ';' => {
                flush(&mut parts, &mut buf);
                i += 1;
                continue;
            }
            // Background `&`, but not `&>`, `>&` or `<&`
            '&' if chars.get(i + 1) != Some(&'>')
                && !matches!(i.checked_sub(1).map(|p| chars[p]), Some('>' | '<')) =>
            {
                flush(&mut parts, &mut buf);
                i += 1;
                continue;
            }
            _ => {}
        }

        buf.push(c);
        i += 1;
    }

    flush(&mut parts, &mut buf);
    parts
}

fn flush(parts: &mut Vec<String>, buf: &mut String) {
    let trimmed = buf.trim();
    if !trimmed.is_empty() {
        parts.push(trimmed.to_string());
    }
    buf.clear();
}

/// Read a here-document delimiter starting at `start` (just past `<<`).
/// Returns the unquoted delimiter and the index after it.
fn heredoc_delimiter(chars: &[char], start: usize) -> (String, usize) {
    let len = chars.len();
    let mut i = start;
    if i < len && chars[i] == '-' {
        i += 1;
    }
    while i < len && (chars[i] == ' ' || chars[i] == '\t') {
        i += 1;
    }
    let mut delim = String::new();
    while i < len {
        let c = chars[i];
        if c.is_whitespace() || matches!(c, ';' | '|' | '&' | '<' | '>' | '(' | ')') {
            break;
        }
        if c != '\'' && c != '"' && c != '\\' {
            delim.push(c);
        }
        i += 1;
    }
    (delim, i)
}

/// Skip here-document body lines up to and including the terminator line.
fn skip_heredoc_body(chars: &[char], start: usize, delim: &str) -> usize {
    let len = chars.len();
    let mut line_start = start;
    while line_start < len {
        let line_end = chars[line_start..]
            .iter()
            .position(|&c| c == '\n')
            .map_or(len, |p| line_start + p);
        let line: String = chars[line_start..line_end].iter().collect();
        if line.trim() == delim {
            return (line_end + 1).min(len);
        }
        line_start = line_end + 1;
    }
    len
}

/// Extract command substitution contents from `$(...)`, backticks and
/// process substitutions `<(...)` / `>(...)`.
///
/// Returns the outer command with each span replaced by [`SUBST_PLACEHOLDER`],
/// plus the extracted inner command strings. `$()` is extracted inside double
/// quotes too (the shell expands it there); single quotes block it.
fn extract_substitutions(command: &str) -> (String, Vec<String>) {
    let chars: Vec<char> = command.chars().collect();
    let len = chars.len();
    let mut outer = String::new();
    let mut inners = Vec::new();
    let mut i = 0;
    let (mut sq, mut dq, mut esc) = (false, false, false);

    while i < len {
        let c = chars[i];

        if esc {
            outer.push(c);
            esc = false;
            i += 1;
            continue;
        }
        if c == '\\' && !sq {
            esc = true;
            outer.push(c);
            i += 1;
            continue;
        }
        if c == '\'' && !dq {
            sq = !sq;
            outer.push(c);
            i += 1;
            continue;
        }
        if c == '"' && !sq {
            dq = !dq;
            outer.push(c);
            i += 1;
            continue;
        }
        if sq {
            outer.push(c);
            i += 1;
            continue;
        }

        let opens_paren_subst = i + 1 < len
            && chars[i + 1] == '('
            && (c == '$' || ((c == '<' || c == '>') && !dq));
        if opens_paren_subst {
            let (inner, next) = balanced_paren_body(&chars, i + 2);
            let trimmed = inner.trim();
            if !trimmed.is_empty() {
                inners.push(trimmed.to_string());
            }
            outer.push_str(SUBST_PLACEHOLDER);
            i = next;
            continue;
        }

        // Backtick: runs to the matching backtick, no nesting
        if c == '`' {
            let mut inner = String::new();
            i += 1;
            while i < len && chars[i] != '`' {
                if chars[i] == '\\' && i + 1 < len {
                    inner.push(chars[i]);
                    inner.push(chars[i + 1]);
                    i += 2;
                    continue;
                }
                inner.push(chars[i]);
                i += 1;
            }
            if i < len {
                i += 1;
            }
            let trimmed = inner.trim();
            if !trimmed.is_empty() {
                inners.push(trimmed.to_string());
            }
            outer.push_str(SUBST_PLACEHOLDER);
            continue;
        }

        outer.push(c);
        i += 1;
    }

    (outer, inners)
}

/// Collect the body of a parenthesised span whose opening `(` ends just
/// before `start`. Returns the body and the index after the closing `)`.
fn balanced_paren_body(chars: &[char], start: usize) -> (String, usize) {
    let len = chars.len();
    let mut depth: u32 = 1;
    let mut inner = String::new();
    let (mut sq, mut dq, mut esc) = (false, false, false);
    let mut i = start;

    while i < len {
        let c = chars[i];
        if esc {
            inner.push(c);
            esc = false;
            i += 1;
            continue;
        }
        if c == '\\' && !sq {
            esc = true;
            inner.push(c);
            i += 1;
            continue;
        }
        if c == '\'' && !dq {
            sq = !sq;
        } else if c == '"' && !sq {
            dq = !dq;
        } else if !sq && !dq {
            if c == '(' {
                depth += 1;
            } else if c == ')' {
                depth -= 1;
                if depth == 0 {
                    return (inner, i + 1);
                }
            }
        }
        inner.push(c);
        i += 1;
    }

    (inner, len)
}

/// Flatten a command into every simple command it contains: the
/// compound parts of the outer text first, then (recursively) the parts of
/// each substitution.
pub fn segments(command: &str) -> Vec<String> {
    let mut out = Vec::new();
    collect_segments(command, 0, &mut out);
    out
}

fn collect_segments(command: &str, depth: usize, out: &mut Vec<String>) {
    let (outer, inners) = extract_substitutions(command);
    out.extend(split_compound_command(&outer));
    if depth >= MAX_SUBSTITUTION_DEPTH {
        return;
    }
    for inner in inners {
        collect_segments(&inner, depth + 1, out);
    }
}
