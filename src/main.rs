//! cc-guardrails: guardrail hooks for Claude Code.
//!
//! `cc-guardrails <evaluator>` reads one hook event as JSON on stdin and
//! signals its decision through the exit code and stdout/stderr.

use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use cc_guardrails::config::Config;
use cc_guardrails::error::Error;
use cc_guardrails::eval::PolicyRegistry;
use cc_guardrails::event::Event;
use cc_guardrails::logging;
use cc_guardrails::render::{self, EXIT_ERROR};
use cc_guardrails::repo::GitInspector;

fn usage(registry: &PolicyRegistry) -> String {
    format!(
        "usage: cc-guardrails <evaluator>\n       \
         cc-guardrails --dump-config | --list | --help | --version\n\n\
         Reads a hook event as JSON on stdin.\n\n\
         evaluators: {}",
        registry.names().join(", ")
    )
}

fn run(evaluator: &str, config: &Config, registry: &PolicyRegistry) -> Result<i32, Error> {
    // Reject typos before touching stdin.
    if !registry.names().iter().any(|name| *name == evaluator) {
        return Err(Error::UnknownEvaluator(evaluator.to_string()));
    }

    let mut input = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut input) {
        log::debug!("{evaluator}: unreadable stdin: {e}");
        return Ok(0);
    }
    let Some(event) = Event::parse(&input) else {
        return Ok(0);
    };

    let cwd = event
        .cwd
        .clone()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    let inspector = GitInspector::from_config(config, cwd);

    let result = registry.evaluate(evaluator, &event, &inspector)?;
    logging::log_decision(evaluator, event.command.as_deref().unwrap_or(""), &result);

    let rendering = render::render(&result, event.hook_event_name.as_deref());
    if let Some(out) = &rendering.stdout {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{out}")?;
        stdout.flush()?;
    }
    if let Some(err) = &rendering.stderr {
        eprintln!("{err}");
    }
    Ok(rendering.exit_code)
}

fn main() -> ExitCode {
    let config = Config::load();
    let registry = PolicyRegistry::from_config(&config);
    let args: Vec<String> = std::env::args().skip(1).collect();

    let Some(first) = args.first().map(String::as_str) else {
        eprintln!("{}", usage(&registry));
        return ExitCode::from(EXIT_ERROR as u8);
    };

    match first {
        "--help" | "-h" => {
            println!("{}", usage(&registry));
            return ExitCode::SUCCESS;
        }
        "--version" | "-V" => {
            println!("cc-guardrails {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        "--list" => {
            for name in registry.names() {
                println!("{name}");
            }
            return ExitCode::SUCCESS;
        }
        "--dump-config" => {
            return match config.to_toml() {
                Ok(toml) => {
                    print!("{toml}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("cc-guardrails: {}", Error::from(e));
                    ExitCode::from(EXIT_ERROR as u8)
                }
            };
        }
        _ => {}
    }

    logging::init(&config.settings);

    match run(first, &config, &registry) {
        Ok(code) => ExitCode::from(code as u8),
        Err(e @ Error::UnknownEvaluator(_)) => {
            eprintln!("cc-guardrails: {e}\n\n{}", usage(&registry));
            ExitCode::from(EXIT_ERROR as u8)
        }
        Err(e) => {
            log::error!("{first}: {e}");
            eprintln!("cc-guardrails: {e}");
            ExitCode::from(EXIT_ERROR as u8)
        }
    }
}
