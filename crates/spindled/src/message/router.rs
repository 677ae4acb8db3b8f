//! Domain routing for control messages.
//!
//! The first token of a message names its domain. The router matches that
//! token exactly and hands the rest of the message to the domain's command
//! table. Unknown domains are answered with a single failure.

use tracing::{debug, info};

use crate::state::SettingsStore;

use super::config_domain::{self, CONFIG_DOMAIN};
use super::errors::MessageError;
use super::lexer::{Lexer, Token};
use super::response::ResponseSink;

/// Tracing target for dispatch operations.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// Known message domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    /// Bar and daemon settings.
    Config,
}

impl Domain {
    /// Parses a domain token. Matching is exact and case-sensitive.
    ///
    /// # Errors
    ///
    /// Returns `MessageError::UnknownDomain` if the token does not name a
    /// known domain.
    pub fn parse(token: &Token<'_>) -> Result<Self, MessageError> {
        if token.matches(CONFIG_DOMAIN) {
            Ok(Self::Config)
        } else {
            Err(MessageError::unknown_domain(token.lossy()))
        }
    }

    /// Returns the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Config => CONFIG_DOMAIN,
        }
    }
}

/// Outcome of dispatching one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    /// Failures reported while handling the message.
    pub failures: usize,
}

impl DispatchResult {
    /// Whether the message was handled without any failure.
    pub fn succeeded(&self) -> bool {
        self.failures == 0
    }
}

/// Routes messages to domain handlers.
#[derive(Debug, Default)]
pub struct DomainRouter;

impl DomainRouter {
    /// Creates a new domain router.
    pub fn new() -> Self {
        Self
    }

    /// Parses and handles one NUL-delimited message against `store`.
    pub fn route(
        &self,
        store: &mut dyn SettingsStore,
        sink: &mut ResponseSink<'_>,
        message: &[u8],
    ) -> DispatchResult {
        let failures_before = sink.failures();
        let mut lexer = Lexer::new(message);
        let domain_token = lexer.next_token();

        if store.debug_output() {
            info!(
                target: DISPATCH_TARGET,
                domain = %domain_token,
                command = %lexer.remainder(),
                "daemon message"
            );
        } else {
            debug!(
                target: DISPATCH_TARGET,
                domain = %domain_token,
                bytes = message.len(),
                "routing message"
            );
        }

        match Domain::parse(&domain_token) {
            Ok(Domain::Config) => config_domain::handle(store, sink, domain_token, &mut lexer),
            Err(error) => sink.fail(&error),
        }
        sink.flush();

        DispatchResult {
            failures: sink.failures() - failures_before,
        }
    }
}
