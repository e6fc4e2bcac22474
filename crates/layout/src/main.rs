use std::io::Read;

use container_layout_lib::command::execute_json_batch;
use container_layout_lib::state::{DesignState, EngineSettings};

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "container_layout=info".into()),
        )
        .init();

    let progress_path = parse_progress_arg();
    let mut state = DesignState::with_settings(EngineSettings::load());
    if let Some(path) = &progress_path {
        load_progress_file(&mut state, path);
    }

    let mut input = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut input) {
        tracing::error!("Failed to read commands from stdin: {e}");
        std::process::exit(1);
    }

    let responses = match execute_json_batch(&mut state, &input) {
        Ok(responses) => responses,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    };
    match serde_json::to_string_pretty(&responses) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!("Failed to serialize responses: {e}"),
    }

    if let Some(path) = &progress_path {
        save_progress_file(&state, path);
    }
    remember_snap_preferences(&state);
}

/// New sessions start from the snap preferences this run ended with
fn remember_snap_preferences(state: &DesignState) {
    if state.settings().snap != *state.snap_settings() {
        let mut settings = state.settings().clone();
        settings.snap = state.snap_settings().clone();
        settings.save();
    }
}

fn parse_progress_arg() -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        if args[i] == "--progress" && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
        i += 1;
    }
    None
}

fn load_progress_file(state: &mut DesignState, path: &str) {
    match std::fs::read_to_string(path) {
        Ok(json) => match state.load_progress(&json) {
            Ok(()) => {
                tracing::info!("Loaded progress from {path} ({} elements)", state.elements().len());
            }
            Err(e) => {
                tracing::error!("Failed to load progress from {path}: {e}");
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!("No progress at {path}, starting empty");
        }
        Err(e) => {
            tracing::error!("Failed to read progress file {path}: {e}");
        }
    }
}

fn save_progress_file(state: &DesignState, path: &str) {
    match state.save_progress() {
        Ok(json) => {
            if let Err(e) = std::fs::write(path, json) {
                tracing::error!("Failed to write progress file {path}: {e}");
            }
        }
        Err(e) => tracing::error!("Failed to serialize progress: {e}"),
    }
}
