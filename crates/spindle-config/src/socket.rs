//! Control socket endpoints shared by `spindled` and the `spindle` client.
//!
//! Endpoints are written as URLs: `unix:///run/user/1000/spindle/spindled.sock`
//! or `tcp://127.0.0.1:9797`. The daemon binds the endpoint and the client
//! connects to it, so both sides parse the same representation.

use std::fmt;
use std::fs::DirBuilder;
use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Declarative configuration for the control socket.
///
/// Deserialises from either a URL string (as supplied through environment
/// variables and flags) or a `transport`-tagged table (as written in
/// configuration files). Serialises as the tagged table.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(
    tag = "transport",
    rename_all = "snake_case",
    try_from = "EndpointRepr"
)]
pub enum SocketEndpoint {
    /// Unix domain socket endpoint.
    Unix { path: Utf8PathBuf },
    /// TCP socket endpoint.
    Tcp { host: String, port: u16 },
}

impl SocketEndpoint {
    /// Builds a Unix domain socket endpoint.
    #[must_use]
    pub fn unix(path: impl Into<Utf8PathBuf>) -> Self {
        Self::Unix { path: path.into() }
    }

    /// Builds a TCP socket endpoint.
    #[must_use]
    pub fn tcp(host: impl Into<String>, port: u16) -> Self {
        Self::Tcp {
            host: host.into(),
            port,
        }
    }

    /// Socket file path, for Unix endpoints.
    #[must_use]
    pub fn unix_path(&self) -> Option<&Utf8Path> {
        if let Self::Unix { path } = self {
            Some(path)
        } else {
            None
        }
    }

    /// Ensures the directory holding a Unix socket exists, creating it owner
    /// only (`0700`) when missing. A no-op for TCP.
    pub fn prepare_filesystem(&self) -> Result<(), SocketPreparationError> {
        let Some(path) = self.unix_path() else {
            return Ok(());
        };
        let directory = path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .ok_or_else(|| SocketPreparationError::NoDirectory {
                path: path.to_owned(),
            })?;
        if directory.is_dir() {
            return Ok(());
        }
        private_dir_builder()
            .create(directory)
            .map_err(|source| SocketPreparationError::CreateDirectory {
                path: directory.to_owned(),
                source,
            })
    }
}

fn private_dir_builder() -> DirBuilder {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    std::os::unix::fs::DirBuilderExt::mode(&mut builder, 0o700);
    builder
}

impl fmt::Display for SocketEndpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unix { path } => write!(formatter, "unix://{path}"),
            Self::Tcp { host, port } => write!(formatter, "tcp://{host}:{port}"),
        }
    }
}

impl FromStr for SocketEndpoint {
    type Err = SocketParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let url = Url::parse(input).map_err(|source| SocketParseError::Url {
            input: input.to_owned(),
            source,
        })?;
        let missing = |part| SocketParseError::Missing {
            part,
            input: input.to_owned(),
        };
        match url.scheme() {
            "unix" if url.path().is_empty() => Err(missing("socket path")),
            "unix" => Ok(Self::unix(url.path())),
            "tcp" => {
                let host = url.host_str().ok_or_else(|| missing("host"))?;
                let port = url.port().ok_or_else(|| missing("port"))?;
                Ok(Self::tcp(host, port))
            }
            scheme => Err(SocketParseError::Scheme(scheme.to_owned())),
        }
    }
}

#[derive(Deserialize)]
#[serde(tag = "transport", rename_all = "snake_case")]
enum TaggedEndpoint {
    Unix { path: Utf8PathBuf },
    Tcp { host: String, port: u16 },
}

/// Accepted on-disk and environment forms of an endpoint.
#[derive(Deserialize)]
#[serde(untagged)]
enum EndpointRepr {
    Url(String),
    Tagged(TaggedEndpoint),
}

impl TryFrom<EndpointRepr> for SocketEndpoint {
    type Error = SocketParseError;

    fn try_from(repr: EndpointRepr) -> Result<Self, Self::Error> {
        Ok(match repr {
            EndpointRepr::Url(url) => return url.parse(),
            EndpointRepr::Tagged(TaggedEndpoint::Unix { path }) => Self::Unix { path },
            EndpointRepr::Tagged(TaggedEndpoint::Tcp { host, port }) => Self::Tcp { host, port },
        })
    }
}

/// Reasons an endpoint string was refused.
#[derive(Debug, Error)]
pub enum SocketParseError {
    /// Only `unix://` and `tcp://` are understood.
    #[error("unsupported socket scheme '{0}' (expected unix or tcp)")]
    Scheme(String),
    /// A required URL component was absent.
    #[error("no {part} in socket endpoint '{input}'")]
    Missing { part: &'static str, input: String },
    /// The text is not a URL at all.
    #[error("'{input}' is not a socket URL: {source}")]
    Url {
        input: String,
        #[source]
        source: url::ParseError,
    },
}

/// Failures preparing the directory of a Unix socket.
#[derive(Debug, Error)]
pub enum SocketPreparationError {
    #[error("socket path '{path}' has no parent directory")]
    NoDirectory { path: Utf8PathBuf },
    #[error("cannot create socket directory '{path}': {source}")]
    CreateDirectory {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}
