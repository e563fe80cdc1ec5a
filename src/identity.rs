//! Process identity: environment, application name, and launch constants.
//!
//! Resolved once at startup and immutable afterwards. The environment comes
//! from, in decreasing precedence:
//!   1. `--environment=<name>` or `--environment <name>` on the command line
//!   2. the `BESTMAN_ENVIRONMENT` variable
//!   3. the default, `Production`
//!
//! Anything outside the canonical set (`Development`, `Staging`,
//! `Production`, case-sensitive) normalises to `Production`. The resolved
//! name is written back to `BESTMAN_ENVIRONMENT` so downstream configuration
//! loaders observe the same value.

use std::{
    env, fmt,
    path::{Path, PathBuf},
    process,
    sync::OnceLock,
};

/// Ambient variable carrying the deployment environment name.
pub const ENVIRONMENT_VAR: &str = "BESTMAN_ENVIRONMENT";

/// Command-line flag recognised by the resolver.
pub const ENVIRONMENT_FLAG: &str = "--environment";

/// Domains the application will accept requests for.
pub const ALLOWED_DOMAINS: [&str; 2] = ["localhost", "mybestman"];

/// Logical deployment tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Canonical name, matching the configuration overlays.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "Development",
            Self::Staging => "Staging",
            Self::Production => "Production",
        }
    }

    /// Exact (case-sensitive) match against the canonical set.
    fn from_canonical(raw: &str) -> Option<Self> {
        match raw {
            "Development" => Some(Self::Development),
            "Staging" => Some(Self::Staging),
            "Production" => Some(Self::Production),
            _ => None,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Process-wide launch constants, fixed after [`ProcessIdentity::resolve`].
#[derive(Debug, Clone)]
pub struct ProcessIdentity {
    /// Name of the entry executable (file stem), falling back to the crate name.
    pub application_name: String,
    pub environment: Environment,
    /// Coarse platform family label (`std::env::consts::OS`).
    pub operating_system: String,
    /// OS-assigned process id, stringified.
    pub process_id: String,
    /// Directory containing the running executable.
    pub execution_path: PathBuf,
    pub app_settings_file_name: String,
    pub hosting_file_name: String,
    /// OS-specific hosting overlay: `hosting.<operating_system>.json`.
    pub hosting_os_file_name: String,
    pub allowed_domains: Vec<String>,
}

static IDENTITY: OnceLock<ProcessIdentity> = OnceLock::new();

impl ProcessIdentity {
    /// Resolve the process identity. First call computes it and writes the
    /// normalised environment name back to [`ENVIRONMENT_VAR`]; subsequent
    /// calls return the cached value with no side effects.
    pub fn resolve() -> &'static ProcessIdentity {
        IDENTITY.get_or_init(|| {
            let args: Vec<String> = env::args().skip(1).collect();
            let ambient = env::var(ENVIRONMENT_VAR).ok();
            let identity = Self::resolve_from(&args, ambient.as_deref());
            // SAFETY: startup is single-threaded; nothing reads the
            // environment concurrently with this write-back.
            unsafe { env::set_var(ENVIRONMENT_VAR, identity.environment.as_str()) };
            identity
        })
    }

    /// Pure resolution from explicit inputs. Tests use this directly instead
    /// of mutating process globals.
    pub fn resolve_from(args: &[String], ambient_environment: Option<&str>) -> ProcessIdentity {
        let raw = flag_value(args, ENVIRONMENT_FLAG)
            .or_else(|| ambient_environment.map(str::to_string));
        let environment = raw
            .as_deref()
            .and_then(Environment::from_canonical)
            .unwrap_or(Environment::Production);

        let exe = env::current_exe().ok();
        let application_name = exe
            .as_deref()
            .and_then(Path::file_stem)
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());
        let execution_path = exe
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let operating_system = env::consts::OS.to_string();
        let hosting_os_file_name = format!("hosting.{operating_system}.json");

        ProcessIdentity {
            application_name,
            environment,
            operating_system,
            process_id: process::id().to_string(),
            execution_path,
            app_settings_file_name: "appsettings.json".to_string(),
            hosting_file_name: "hosting.json".to_string(),
            hosting_os_file_name,
            allowed_domains: ALLOWED_DOMAINS.iter().map(|d| (*d).to_string()).collect(),
        }
    }
}

/// Extract the value of `flag` from `args`, accepting `flag=value` and
/// `flag value` forms. The flag name matches case-insensitively; the first
/// occurrence decides. An empty value after `=`, or a trailing flag with no
/// follower, counts as "no value supplied".
pub(crate) fn flag_value(args: &[String], flag: &str) -> Option<String> {
    for (i, arg) in args.iter().enumerate() {
        if let Some((name, value)) = arg.split_once('=') {
            if name.eq_ignore_ascii_case(flag) {
                let value = value.trim();
                return (!value.is_empty()).then(|| value.to_string());
            }
        } else if arg.eq_ignore_ascii_case(flag) {
            return args.get(i + 1).map(|next| next.trim().to_string());
        }
    }
    None
}
