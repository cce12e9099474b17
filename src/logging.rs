use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};

use crate::config::Settings;
use crate::eval::RuleMatch;

const MAX_COMMAND_CHARS: usize = 200;

/// `~/.local/share/cc-guardrails/decisions.log`, when `HOME` is set.
pub fn log_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(PathBuf::from(home).join(".local/share/cc-guardrails/decisions.log"))
}

/// Install the file logger. Best-effort: any failure leaves logging off,
/// since logging must never block the hook.
pub fn init(settings: &Settings) {
    if !settings.log_decisions {
        return;
    }
    let Some(path) = log_path() else {
        return;
    };
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let level = effective_level(settings);
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();
    let _ = WriteLogger::init(level, config, file);
}

/// Logger threshold. Decisions are written at info, so `log_level` can add
/// diagnostics below it but never silence the decision lines.
pub fn effective_level(settings: &Settings) -> LevelFilter {
    let configured = settings.log_level.parse().unwrap_or(LevelFilter::Info);
    configured.max(LevelFilter::Info)
}

/// One tab-separated decision record: evaluator, label, command, reason.
pub fn decision_line(evaluator: &str, command: &str, result: &RuleMatch) -> String {
    // Compact single-line reason for the log (replace newlines with "; ")
    let reason_oneline = result.reason.replace('\n', "; ");
    let cmd_truncated: String = command
        .chars()
        .take(MAX_COMMAND_CHARS)
        .map(|c| if c == '\n' || c == '\t' { ' ' } else { c })
        .collect();
    format!(
        "{evaluator}\t{}\t{cmd_truncated}\t{reason_oneline}",
        result.decision.label()
    )
}

pub fn log_decision(evaluator: &str, command: &str, result: &RuleMatch) {
    log::info!("{}", decision_line(evaluator, command, result));
}
