//! Bestman entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Resolve process identity and environment
//!   3. Bootstrap logger from appsettings + env + args
//!   4. Re-read the full configuration, swap in the final logger
//!   5. Report launch details and build info

use tracing::info;

use bestman_bootstrap::{
    error::AppError,
    identity::ProcessIdentity,
    logger::Logger,
    settings, startup,
};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    // Load .env if present; the file is optional.
    let _ = dotenvy::dotenv();

    let identity = ProcessIdentity::resolve();
    let args: Vec<String> = std::env::args().skip(1).collect();

    let settings_path = identity.execution_path.join(&identity.app_settings_file_name);
    let bootstrap_settings = settings::load(&settings_path, &args)?;
    let mut logger = Logger::bootstrap(&bootstrap_settings)?;

    // Every entry from here on carries the ambient application context.
    let _app_span = tracing::info_span!(
        "app",
        name = %identity.application_name,
        environment = %identity.environment
    )
    .entered();

    info!(environment = %identity.environment, "bootstrap logging online");

    // The hosting layer's complete configuration graph; re-read so the
    // final sink reflects any values the bootstrap pass had not seen.
    let full_settings = settings::load(&settings_path, &args)?;
    logger.finalize(&full_settings)?;

    startup::report(&args, identity)?;

    Ok(())
    // `logger` drops here, draining the async console sink.
}
