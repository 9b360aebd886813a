//! Replay a polygon edit script headlessly.
//!
//! Usage: `polyedit-replay <script.json> [--config <config.json>]`
//!
//! Prints one JSON line per step followed by the final annotation.

use std::path::PathBuf;
use std::process::ExitCode;

use polyedit::config::EditConfig;
use polyedit::replay::{self, ReplayScript};

struct Args {
    script: PathBuf,
    config: Option<PathBuf>,
}

fn parse_args() -> Result<Args, String> {
    let mut script = None;
    let mut config = None;
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().ok_or("--config needs a path")?;
                config = Some(PathBuf::from(path));
            }
            "-h" | "--help" => return Err(String::new()),
            _ if script.is_none() => script = Some(PathBuf::from(arg)),
            _ => return Err(format!("unexpected argument '{}'", arg)),
        }
    }

    Ok(Args {
        script: script.ok_or("missing script path")?,
        config,
    })
}

fn load_config(path: Option<&PathBuf>) -> Result<EditConfig, String> {
    match path {
        Some(path) => EditConfig::load(path).map_err(|e| format!("{:?}: {}", path, e)),
        None => Ok(EditConfig::load_from_default_path().unwrap_or_default()),
    }
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            if !msg.is_empty() {
                eprintln!("Error: {}", msg);
            }
            eprintln!("Usage: polyedit-replay <script.json> [--config <config.json>]");
            return ExitCode::FAILURE;
        }
    };

    // Logging isn't up yet while the config loads, so report errors directly.
    let config = match load_config(args.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config {}", e);
            return ExitCode::FAILURE;
        }
    };

    env_logger::Builder::new()
        .filter_level(config.log_level.to_level_filter())
        .parse_default_env()
        .init();

    let script = match std::fs::read_to_string(&args.script)
        .map_err(|e| e.to_string())
        .and_then(|json| ReplayScript::from_json(&json).map_err(|e| e.to_string()))
    {
        Ok(script) => script,
        Err(e) => {
            eprintln!("Failed to read script {:?}: {}", args.script, e);
            return ExitCode::FAILURE;
        }
    };

    log::info!(
        "Replaying {} steps on a {}-vertex polygon",
        script.steps.len(),
        script.polygon.len()
    );
    let report = replay::run(&script, &config);

    for outcome in &report.outcomes {
        match serde_json::to_string(outcome) {
            Ok(line) => println!("{}", line),
            Err(e) => log::error!("Failed to serialize step {}: {}", outcome.step, e),
        }
    }
    match serde_json::to_string_pretty(&report.annotation) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize annotation: {}", e);
            return ExitCode::FAILURE;
        }
    }

    log::info!("{} change notifications fired", report.notifications);
    ExitCode::SUCCESS
}
