//! Behavioural coverage for layered configuration loading.

use std::cell::RefCell;
use std::ffi::OsString;
use std::fs;
use std::sync::{Mutex, MutexGuard};

use once_cell::sync::Lazy;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

use spindle_config::{
    Config, SocketEndpoint, default_log_filter, default_log_format, default_socket_endpoint,
};

const SOCKET_VARIABLE: &str = "SPINDLE_DAEMON_SOCKET";

static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

struct Harness {
    temp_dir: TempDir,
    cli_args: RefCell<Vec<OsString>>,
    previous_socket: Option<OsString>,
    loaded: RefCell<Option<Config>>,
    error: RefCell<Option<String>>,
    _env_guard: MutexGuard<'static, ()>,
}

impl Harness {
    fn new() -> Self {
        let guard = ENV_MUTEX
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let previous_socket = std::env::var_os(SOCKET_VARIABLE);
        // Start every scenario from a clean environment.
        unsafe { std::env::remove_var(SOCKET_VARIABLE) };
        Self {
            temp_dir: TempDir::new().expect("temporary directory"),
            cli_args: RefCell::new(vec![OsString::from("spindle")]),
            previous_socket,
            loaded: RefCell::new(None),
            error: RefCell::new(None),
            _env_guard: guard,
        }
    }

    fn write_config(&self, socket: &SocketEndpoint) {
        let path = self.temp_dir.path().join("spindle.toml");
        let toml = match socket {
            SocketEndpoint::Unix { path } => {
                format!("daemon_socket = {{ transport = \"unix\", path = \"{path}\" }}\n")
            }
            SocketEndpoint::Tcp { host, port } => format!(
                "daemon_socket = {{ transport = \"tcp\", host = \"{host}\", port = {port} }}\n"
            ),
        };
        fs::write(&path, toml).expect("write configuration");

        let mut args = self.cli_args.borrow_mut();
        args.push(OsString::from("--config-path"));
        args.push(path.into_os_string());
    }

    fn load(&self) {
        if self.loaded.borrow().is_some() || self.error.borrow().is_some() {
            return;
        }
        let args = self.cli_args.borrow().clone();
        match Config::load_from_iter(args) {
            Ok(config) => *self.loaded.borrow_mut() = Some(config),
            Err(error) => *self.error.borrow_mut() = Some(error.to_string()),
        }
    }

    fn loaded_config(&self) -> Config {
        self.load();
        if let Some(error) = self.error.borrow().as_ref() {
            panic!("configuration failed to load: {error}");
        }
        self.loaded
            .borrow()
            .clone()
            .expect("configuration should be loaded")
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        match self.previous_socket.take() {
            Some(value) => unsafe { std::env::set_var(SOCKET_VARIABLE, value) },
            None => unsafe { std::env::remove_var(SOCKET_VARIABLE) },
        }
    }
}

fn parse_socket(socket: &str) -> SocketEndpoint {
    socket
        .trim_matches('"')
        .parse()
        .unwrap_or_else(|error| panic!("invalid socket '{socket}': {error}"))
}

#[fixture]
fn harness() -> Harness {
    Harness::new()
}

#[given("a configuration file setting the daemon socket to \"{socket}\"")]
fn given_configuration_file(harness: &Harness, socket: String) {
    harness.write_config(&parse_socket(&socket));
}

#[given("the environment overrides the daemon socket to \"{socket}\"")]
fn given_environment_override(socket: String) {
    unsafe { std::env::set_var(SOCKET_VARIABLE, socket.trim_matches('"')) };
}

#[when("the CLI sets the daemon socket to \"{socket}\"")]
fn when_cli_override(harness: &Harness, socket: String) {
    let mut args = harness.cli_args.borrow_mut();
    args.push(OsString::from("--daemon-socket"));
    args.push(OsString::from(socket.trim_matches('"')));
}

#[when("the configuration loads without overrides")]
fn when_load_without_overrides(harness: &Harness) {
    harness.load();
}

#[then("loading the configuration resolves the daemon socket to \"{socket}\"")]
fn then_resolved_socket(harness: &Harness, socket: String) {
    let config = harness.loaded_config();
    assert_eq!(config.daemon_socket(), &parse_socket(&socket));
}

#[then("loading the configuration applies the built-in defaults")]
fn then_defaults_applied(harness: &Harness) {
    let config = harness.loaded_config();
    assert_eq!(config.daemon_socket(), &default_socket_endpoint());
    assert_eq!(config.log_filter(), default_log_filter());
    assert_eq!(config.log_format(), default_log_format());
    assert!(!config.debug_output());
}

#[scenario(path = "tests/features/configuration_precedence.feature", index = 0)]
fn defaults_apply(#[from(harness)] harness: Harness) {
    let _ = harness;
}

#[scenario(path = "tests/features/configuration_precedence.feature", index = 1)]
fn file_sets_socket(#[from(harness)] harness: Harness) {
    let _ = harness;
}

#[scenario(path = "tests/features/configuration_precedence.feature", index = 2)]
fn environment_overrides_file(#[from(harness)] harness: Harness) {
    let _ = harness;
}

#[scenario(path = "tests/features/configuration_precedence.feature", index = 3)]
fn cli_overrides_everything(#[from(harness)] harness: Harness) {
    let _ = harness;
}
