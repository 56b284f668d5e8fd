// HTTP transport for the flow API.
//
// `Client::new` takes any `reqwest::Client`. This module is the stock way to
// make one: request timeout, a `nifi-api/<version>` user agent and the
// certificate policy for `https` endpoints.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Error;

/// How server certificates are checked on `https` endpoints. Ignored for
/// plain `http`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsMode {
    /// Trust the platform's root store.
    #[default]
    System,
    /// Also trust the PEM-encoded CA at this path, e.g. a cluster's
    /// internal authority.
    CustomCa(PathBuf),
    /// Skip verification entirely. Only for throwaway local instances
    /// running a self-signed certificate.
    DangerAcceptInvalid,
}

/// Settings for the `reqwest::Client` handed to [`Client::new`](crate::Client::new).
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    /// Applies to each request as a whole, connect through body.
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build the HTTP client. Fails with [`Error::Tls`] if the CA file is
    /// unreadable or not PEM.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("nifi-api/", env!("CARGO_PKG_VERSION")));

        let builder = match &self.tls {
            TlsMode::System => builder,
            TlsMode::CustomCa(path) => builder.add_root_certificate(load_ca(path)?),
            TlsMode::DangerAcceptInvalid => builder.danger_accept_invalid_certs(true),
        };

        builder
            .build()
            .map_err(|e| Error::Tls(format!("cannot build HTTP client: {e}")))
    }
}

fn load_ca(path: &Path) -> Result<reqwest::Certificate, Error> {
    let pem = std::fs::read(path)
        .map_err(|e| Error::Tls(format!("cannot read CA file {}: {e}", path.display())))?;
    reqwest::Certificate::from_pem(&pem)
        .map_err(|e| Error::Tls(format!("{} is not a PEM certificate: {e}", path.display())))
}
