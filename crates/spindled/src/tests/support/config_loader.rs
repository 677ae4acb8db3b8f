//! Configuration loaders covering success and failure paths.

use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;

use ortho_config::OrthoError;
use tempfile::TempDir;

use spindle_config::{Config, SocketEndpoint};

use crate::bootstrap::ConfigLoader;

/// Loader that places the control socket under a private temporary directory.
pub struct TestConfigLoader {
    socket_dir: TempDir,
}

impl TestConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            socket_dir: TempDir::new().expect("temporary directory for socket"),
        }
    }

    /// Socket path inside a nested directory the bootstrap has to create.
    #[must_use]
    pub fn socket_path(&self) -> PathBuf {
        self.socket_dir.path().join("run").join("spindled.sock")
    }
}

impl ConfigLoader for TestConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        let path = self.socket_path();
        Ok(Config {
            daemon_socket: SocketEndpoint::unix(path.to_str().expect("utf8 socket path")),
            ..Config::default()
        })
    }
}

/// Loader that fails by passing an unsupported socket scheme.
pub struct FailingConfigLoader;

impl ConfigLoader for FailingConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load_from_iter([
            OsString::from("spindled"),
            OsString::from("--daemon-socket"),
            OsString::from("invalid://socket"),
        ])
    }
}
