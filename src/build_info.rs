//! Build provenance: `BuildInfo.properties` parsing plus host identity.
//!
//! The properties file is written by the build pipeline and dropped next to
//! the executable. Its format is loose: only lines containing exactly one
//! `=` count as key/value pairs, everything else is informational and
//! skipped. A missing file is not an error; any other read failure is.

use std::{
    fmt, fs, io,
    net::ToSocketAddrs,
    path::Path,
};

use crate::error::AppError;

/// File name looked up inside the execution directory.
pub const BUILD_INFO_FILE: &str = "BuildInfo.properties";

/// Order-preserving, key-unique build metadata mapping.
///
/// Keys appear in file order; a duplicate key overwrites the earlier value
/// in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildInfo {
    entries: Vec<(String, String)>,
}

impl BuildInfo {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, key: String, value: String) {
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }
}

/// Renders as `key=value` pairs joined by `, ` so the whole mapping can be
/// carried in one structured log field.
impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

/// Read `BuildInfo.properties` from `execution_path`.
///
/// Returns `Ok(None)` when the file does not exist (the caller logs a
/// warning); other I/O failures propagate. On success the parsed mapping
/// carries two synthesized trailing entries, `machineName` and `machineIP`.
pub fn read(execution_path: &Path) -> Result<Option<BuildInfo>, AppError> {
    let path = execution_path.join(BUILD_INFO_FILE);
    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(AppError::Io(e)),
    };

    let mut info = parse(&contents);
    let name = machine_name();
    let ip = machine_ip(&name);
    info.insert("machineName".to_string(), name);
    info.insert("machineIP".to_string(), ip);
    Ok(Some(info))
}

/// Total over arbitrary input: lines without exactly one `=` are skipped,
/// never rejected.
fn parse(contents: &str) -> BuildInfo {
    let mut info = BuildInfo::default();
    for line in contents.lines() {
        if line.matches('=').count() != 1 {
            continue;
        }
        // The count check guarantees the split succeeds; segments are kept
        // raw, untrimmed.
        if let Some((key, value)) = line.split_once('=') {
            info.insert(key.to_string(), value.to_string());
        }
    }
    info
}

fn machine_name() -> String {
    hostname::get()
        .map(|h| h.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// First IPv4 address the host name resolves to, or an empty string.
fn machine_ip(machine_name: &str) -> String {
    if machine_name.is_empty() {
        return String::new();
    }
    (machine_name, 0u16)
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.find(|a| a.is_ipv4()))
        .map(|a| a.ip().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parse_keeps_only_single_equals_lines() {
        let info = parse("version=1.2.3\nbuild#only-a-comment\nhash=abc=def\n");
        assert_eq!(info.get("version"), Some("1.2.3"));
        assert_eq!(info.get("hash"), None);
        assert_eq!(info.len(), 1);
    }

    #[test]
    fn parse_keeps_segments_raw() {
        let info = parse(" spaced key = spaced value \n");
        assert_eq!(info.get(" spaced key "), Some(" spaced value "));
    }

    #[test]
    fn parse_preserves_file_order() {
        let info = parse("b=2\na=1\nc=3\n");
        let keys: Vec<&str> = info.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn later_duplicate_overwrites_earlier() {
        let info = parse("version=1.0.0\nversion=2.0.0\n");
        assert_eq!(info.get("version"), Some("2.0.0"));
        assert_eq!(info.len(), 1);
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(read(dir.path()).unwrap().is_none());
    }

    #[test]
    fn read_appends_machine_identity() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(BUILD_INFO_FILE),
            "version=1.2.3\nbuild#only-a-comment\nhash=abc=def\n",
        )
        .unwrap();

        let info = read(dir.path()).unwrap().unwrap();
        assert_eq!(info.get("version"), Some("1.2.3"));
        assert!(info.get("machineName").is_some());
        assert!(info.get("machineIP").is_some());
        assert_eq!(info.len(), 3);

        let keys: Vec<&str> = info.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["version", "machineName", "machineIP"]);
    }

    #[test]
    fn empty_file_yields_only_synthesized_keys() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(BUILD_INFO_FILE), "just a note, no pairs\n").unwrap();

        let info = read(dir.path()).unwrap().unwrap();
        let keys: Vec<&str> = info.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["machineName", "machineIP"]);
    }

    #[test]
    fn display_joins_pairs() {
        let info = parse("a=1\nb=2\n");
        assert_eq!(info.to_string(), "a=1, b=2");
    }
}
