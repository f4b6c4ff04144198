//! HTTP client adapter for trust-list retrieval.
//!
//! Performs a single blocking GET per call. Retry policy belongs to the
//! caller (the reload pipeline simply tries again on the next tick).

use crate::domain::types::TrustListUrl;
use crate::infra::config::HttpSettings;
use crate::infra::error::{TrustError, TrustResult};
use std::time::Duration;

/// Transport used by the fetcher to download raw trust-list bytes.
///
/// Implementations must report every failure, including non-success HTTP
/// status codes, as `TrustError::FetchFailure`.
pub trait TrustListTransport: Send + Sync {
    /// Download the resource at `url`.
    ///
    /// # Errors
    ///
    /// Returns `FetchFailure` carrying the URL and the underlying cause.
    fn get(&self, url: &TrustListUrl) -> TrustResult<Vec<u8>>;
}

/// Forward proxy settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
    pub user_name: Option<String>,
    pub password: Option<String>,
}

/// Configuration for trust-list HTTP operations.
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    pub connect_timeout: Duration,
    /// Upper bound for receiving the complete response once connected.
    pub read_timeout: Duration,
    pub proxy: Option<ProxyConfig>,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        (&HttpSettings::default()).into()
    }
}

impl From<&HttpSettings> for HttpTransportConfig {
    fn from(cfg: &HttpSettings) -> Self {
        Self {
            connect_timeout: Duration::from_millis(cfg.connect_timeout_millis),
            read_timeout: Duration::from_millis(cfg.read_timeout_millis),
            proxy: cfg.proxy.as_ref().map(|p| ProxyConfig {
                host: p.host.clone(),
                port: p.port,
                user_name: p.user_name.clone(),
                password: p.password.clone(),
            }),
        }
    }
}

/// Blocking `reqwest` implementation of [`TrustListTransport`].
pub struct HttpTrustListClient {
    cfg: HttpTransportConfig,
    http: reqwest::blocking::Client,
}

impl HttpTrustListClient {
    /// Create a new client from config.
    pub fn new(cfg: HttpTransportConfig) -> TrustResult<Self> {
        let mut builder = reqwest::blocking::Client::builder()
            .connect_timeout(cfg.connect_timeout)
            .timeout(cfg.connect_timeout + cfg.read_timeout)
            .user_agent(concat!("sigval-trust/", env!("CARGO_PKG_VERSION")));

        if let Some(proxy_cfg) = &cfg.proxy {
            let proxy_url = format!("http://{}:{}", proxy_cfg.host, proxy_cfg.port);
            let mut proxy = reqwest::Proxy::all(&proxy_url).map_err(|e| {
                TrustError::ConfigurationError(format!("Invalid proxy {proxy_url}: {e}"))
            })?;
            if let Some(user) = &proxy_cfg.user_name {
                proxy = proxy.basic_auth(user, proxy_cfg.password.as_deref().unwrap_or_default());
            }
            log::debug!("Using HTTP proxy {proxy_url}");
            builder = builder.proxy(proxy);
        }

        let http = builder.build().map_err(|e| {
            TrustError::NetworkError(format!("Failed to create HTTP client: {e}"))
        })?;
        Ok(Self { cfg, http })
    }

    #[must_use]
    pub fn config(&self) -> &HttpTransportConfig {
        &self.cfg
    }
}

impl TrustListTransport for HttpTrustListClient {
    fn get(&self, url: &TrustListUrl) -> TrustResult<Vec<u8>> {
        let failure = |cause: String| TrustError::FetchFailure {
            uri: url.to_string(),
            cause,
        };

        log::debug!("GET {url}");
        let resp = self.http.get(url.as_str()).send().map_err(|e| {
            if e.is_timeout() {
                failure(format!("timed out: {e}"))
            } else {
                failure(format!("HTTP error: {e}"))
            }
        })?;
        if !resp.status().is_success() {
            return Err(failure(format!("HTTP {}", resp.status())));
        }
        let bytes = resp
            .bytes()
            .map_err(|e| failure(format!("Read body failed: {e}")))?;
        log::debug!("Downloaded {} bytes from {url}", bytes.len());
        Ok(bytes.to_vec())
    }
}
