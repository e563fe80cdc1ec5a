//! Startup diagnostics: how the process was launched, plus build provenance.

use tracing::{info, warn};

use crate::{
    build_info::{self, BUILD_INFO_FILE},
    error::AppError,
    identity::ProcessIdentity,
};

/// Emit the fixed startup report. Call once, after logging is bootstrapped.
///
/// The line order and the argument-message selection are contracts:
/// downstream log consumers parse these messages.
pub fn report(args: &[String], identity: &ProcessIdentity) -> Result<(), AppError> {
    info!(
        "{} is starting {}.",
        identity.application_name,
        launch_description(args)
    );
    info!(process_id = %identity.process_id, "application launched as a process");
    info!(base_directory = %identity.execution_path.display(), "base directory path");
    info!(os_platform = %identity.operating_system, "operating system platform");

    match build_info::read(&identity.execution_path)? {
        Some(info) => info!(build_info = %info, "build info of the application"),
        None => warn!("couldn't find the {BUILD_INFO_FILE} file"),
    }

    Ok(())
}

/// Three-way launch phrasing: no arguments, one, or several.
fn launch_description(args: &[String]) -> String {
    match args {
        [] => "without any arguments".to_string(),
        [only] => format!("with argument '{only}'"),
        many => format!("with arguments '{}'", many.join(" ")),
    }
}
