//! `TrustAnchorReloader`: rebuilds and publishes the trust-anchor snapshot.
//!
//! Steps per cycle:
//! 1. Resolve the trust-list location from the policy root SIA extension
//! 2. Fetch the trust list (skipped when no location is published)
//! 3. Extract the embedded certificates
//! 4. Build a snapshot of policy root, additional certificates and the list
//! 5. Publish it through the shared `TrustAnchorHolder`
//!
//! A failed cycle leaves the holder untouched. Scheduling is left to the
//! caller, which can use [`TrustAnchorReloader::reload_interval`].

use crate::adapters::trust_list_http_client::{
    HttpTransportConfig, HttpTrustListClient, TrustListTransport,
};
use crate::infra::config::{TrustConfiguration, DEFAULT_RELOAD_INTERVAL_SECONDS};
use crate::infra::error::{TrustError, TrustResult};
use crate::services::cert_source::{load_certificate, load_trusted_folder};
use crate::services::{
    CmsCertificateExtractor, TrustAnchorHolder, TrustAnchorStore, TrustListFetcher,
};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use x509_cert::Certificate;

pub struct TrustAnchorReloader<T> {
    policy_root: Option<Certificate>,
    additional: Vec<Certificate>,
    fetcher: TrustListFetcher<T>,
    holder: Arc<TrustAnchorHolder>,
    reload_lock: Mutex<()>,
    reload_interval: Duration,
}

impl<T: TrustListTransport> TrustAnchorReloader<T> {
    #[must_use]
    pub fn new(policy_root: Option<Certificate>, transport: T) -> Self {
        Self {
            policy_root,
            additional: Vec::new(),
            fetcher: TrustListFetcher::new(transport),
            holder: Arc::new(TrustAnchorHolder::new()),
            reload_lock: Mutex::new(()),
            reload_interval: Duration::from_secs(DEFAULT_RELOAD_INTERVAL_SECONDS),
        }
    }

    /// Certificates trusted in addition to the policy root and trust list.
    #[must_use]
    pub fn with_additional(mut self, additional: Vec<Certificate>) -> Self {
        self.additional = additional;
        self
    }

    /// Publish into an existing holder instead of a private one.
    #[must_use]
    pub fn with_holder(mut self, holder: Arc<TrustAnchorHolder>) -> Self {
        self.holder = holder;
        self
    }

    #[must_use]
    pub fn with_reload_interval(mut self, interval: Duration) -> Self {
        self.reload_interval = interval;
        self
    }

    #[must_use]
    pub fn holder(&self) -> Arc<TrustAnchorHolder> {
        Arc::clone(&self.holder)
    }

    #[must_use]
    pub fn reload_interval(&self) -> Duration {
        self.reload_interval
    }

    #[must_use]
    pub fn policy_root(&self) -> Option<&Certificate> {
        self.policy_root.as_ref()
    }

    /// Run one reload cycle and return the published snapshot.
    ///
    /// On error the previously published snapshot stays current.
    pub fn reload(&self) -> TrustResult<Arc<TrustAnchorStore>> {
        let _guard = self
            .reload_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match self.build_snapshot() {
            Ok(store) => Ok(self.holder.publish(store)),
            Err(e) => {
                log::warn!(
                    "Failed to reload trust anchors, keeping snapshot v{}: {e}",
                    self.holder.current().version()
                );
                Err(e)
            }
        }
    }

    fn build_snapshot(&self) -> TrustResult<TrustAnchorStore> {
        let fetched = match &self.policy_root {
            Some(root) => match self.fetcher.resolve_location(root)? {
                Some(url) => {
                    let blob = self.fetcher.fetch(&url)?;
                    let extracted = CmsCertificateExtractor::extract(&blob)?;
                    log::info!(
                        "Trust list {url} provided {} certificate(s), {} skipped",
                        extracted.len(),
                        extracted.skipped().len()
                    );
                    extracted.into_certificates()
                }
                None => {
                    log::debug!("Policy root publishes no trust list, using root only");
                    Vec::new()
                }
            },
            None => {
                log::debug!("No policy root configured");
                Vec::new()
            }
        };
        TrustAnchorStore::build_with_additional(
            self.policy_root.as_ref(),
            &self.additional,
            fetched,
        )
    }
}

impl TrustAnchorReloader<HttpTrustListClient> {
    /// Reloader wired from configuration with the HTTP transport.
    pub fn from_config(config: &TrustConfiguration) -> TrustResult<Self> {
        config.validate()?;
        let policy_root = config
            .policy_root
            .as_deref()
            .map(load_certificate)
            .transpose()?;
        let additional = match config.trusted_folder.as_deref() {
            Some(dir) if dir.is_dir() => load_trusted_folder(dir)?,
            Some(dir) => {
                return Err(TrustError::ConfigurationError(format!(
                    "Trusted folder {} is not a directory",
                    dir.display()
                )))
            }
            None => Vec::new(),
        };
        let transport = HttpTrustListClient::new(HttpTransportConfig::from(&config.http))?;
        Ok(Self::new(policy_root, transport)
            .with_additional(additional)
            .with_reload_interval(config.reload_interval()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::TrustListUrl;

    struct UnreachableTransport;

    impl TrustListTransport for UnreachableTransport {
        fn get(&self, url: &TrustListUrl) -> TrustResult<Vec<u8>> {
            Err(TrustError::FetchFailure {
                uri: url.to_string(),
                cause: "unexpected request".into(),
            })
        }
    }

    #[test]
    fn reload_without_policy_root_publishes_empty_snapshot() {
        let reloader = TrustAnchorReloader::new(None, UnreachableTransport);
        let store = reloader.reload().unwrap();
        assert_eq!(store.version(), 1);
        assert!(store.is_empty());
        assert_eq!(reloader.holder().current().version(), 1);
    }

    #[test]
    fn shared_holder_and_interval() {
        let holder = Arc::new(TrustAnchorHolder::new());
        let reloader = TrustAnchorReloader::new(None, UnreachableTransport)
            .with_holder(Arc::clone(&holder))
            .with_reload_interval(Duration::from_secs(30));
        reloader.reload().unwrap();
        reloader.reload().unwrap();
        assert_eq!(holder.current().version(), 2);
        assert_eq!(reloader.reload_interval(), Duration::from_secs(30));
    }

    #[test]
    fn from_config_rejects_missing_trusted_folder() {
        let config = TrustConfiguration {
            trusted_folder: Some("/nonexistent/sigval-trust/trusted".into()),
            ..TrustConfiguration::default()
        };
        assert!(matches!(
            TrustAnchorReloader::from_config(&config),
            Err(TrustError::ConfigurationError(_))
        ));
    }
}
