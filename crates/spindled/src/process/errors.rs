//! Launch failures, one variant per stage of `run_daemon`.

use thiserror::Error;

use crate::bootstrap::BootstrapError;
use crate::events::EventLoopError;
use crate::transport::ListenerError;

use super::shutdown::ShutdownError;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),
    #[error("control socket: {0}")]
    Listener(#[from] ListenerError),
    #[error("event loop: {0}")]
    EventLoop(#[from] EventLoopError),
    #[error("signal handling: {0}")]
    Shutdown(#[from] ShutdownError),
}
