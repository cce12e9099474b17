//! Best-effort shell text handling: compound splitting, substitution
//! extraction and POSIX word splitting. Not a shell grammar.

pub mod shell;
pub mod tokenize;

pub use shell::{SUBST_PLACEHOLDER, segments};
pub use tokenize::{base_command, basename, is_assignment, redirection_span, tokenize};
