//! Startup report contract: line order and message shapes.

use std::{
    fs,
    io,
    path::Path,
    sync::{Arc, Mutex},
};

use bestman_bootstrap::{
    build_info::BUILD_INFO_FILE,
    identity::{Environment, ProcessIdentity},
    startup,
};
use tempfile::TempDir;
use tracing_subscriber::{fmt, fmt::MakeWriter, layer::SubscriberExt};

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for SharedBuf {
    type Writer = SharedBuf;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn test_identity(execution_path: &Path) -> ProcessIdentity {
    ProcessIdentity {
        application_name: "bestman".to_string(),
        environment: Environment::Staging,
        operating_system: "linux".to_string(),
        process_id: "4242".to_string(),
        execution_path: execution_path.to_path_buf(),
        app_settings_file_name: "appsettings.json".to_string(),
        hosting_file_name: "hosting.json".to_string(),
        hosting_os_file_name: "hosting.linux.json".to_string(),
        allowed_domains: vec!["localhost".to_string(), "mybestman".to_string()],
    }
}

fn capture_report(args: &[String], identity: &ProcessIdentity) -> String {
    let buf = SharedBuf::default();
    let subscriber = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(buf.clone()).with_ansi(false));
    tracing::subscriber::with_default(subscriber, || {
        startup::report(args, identity).unwrap();
    });
    buf.contents()
}

#[test]
fn report_lines_come_in_contract_order() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(BUILD_INFO_FILE),
        "version=1.2.3\nbuiltBy=jenkins\n",
    )
    .unwrap();

    let identity = test_identity(dir.path());
    let out = capture_report(&[], &identity);

    let starting = out.find("bestman is starting without any arguments.").unwrap();
    let pid = out.find("application launched as a process").unwrap();
    let base_dir = out.find("base directory path").unwrap();
    let platform = out.find("operating system platform").unwrap();
    let build = out.find("build info of the application").unwrap();

    assert!(starting < pid);
    assert!(pid < base_dir);
    assert!(base_dir < platform);
    assert!(platform < build);

    assert!(out.contains("4242"));
    assert!(out.contains("version=1.2.3"));
    assert!(out.contains("builtBy=jenkins"));
    assert!(out.contains("machineName"));
}

#[test]
fn single_argument_message_shape() {
    let dir = TempDir::new().unwrap();
    let identity = test_identity(dir.path());
    let out = capture_report(&["start".to_string()], &identity);
    assert!(out.contains("bestman is starting with argument 'start'."));
}

#[test]
fn several_arguments_message_shape() {
    let dir = TempDir::new().unwrap();
    let identity = test_identity(dir.path());
    let out = capture_report(
        &["--environment".to_string(), "Staging".to_string()],
        &identity,
    );
    assert!(out.contains("bestman is starting with arguments '--environment Staging'."));
}

#[test]
fn missing_build_info_logs_a_warning_and_continues() {
    let dir = TempDir::new().unwrap();
    let identity = test_identity(dir.path());
    let out = capture_report(&[], &identity);
    assert!(out.contains("WARN"));
    assert!(out.contains("couldn't find the BuildInfo.properties file"));
    assert!(!out.contains("build info of the application"));
}
