use std::process::ExitCode;

use particle_field::FieldConfig;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,particle_field=debug")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => match FieldConfig::load(&path) {
            Ok(config) => {
                info!(path = %path, "loaded configuration");
                config
            }
            Err(e) => {
                error!(path = %path, error = %e, "invalid configuration");
                return ExitCode::FAILURE;
            }
        },
        None => FieldConfig::default(),
    };

    match particle_field::run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "particle field exited with an error");
            ExitCode::FAILURE
        }
    }
}
