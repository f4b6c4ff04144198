//! Versioned trust-anchor snapshots.
//!
//! A [`TrustAnchorStore`] is built once per reload and never mutated after
//! it is published. [`TrustAnchorHolder`] hands out the current snapshot as
//! an `Arc`; a reload swaps the whole snapshot under a short write lock, so
//! a reader sees either the old pool or the new one.

use crate::infra::error::{TrustError, TrustResult};
use der::Encode;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};
use x509_cert::name::Name;
use x509_cert::Certificate;

/// Subject and SHA-256 fingerprint of one pooled certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateSummary {
    pub subject: String,
    pub sha256_fingerprint: String,
}

/// Immutable, issuer-indexable certificate pool.
#[derive(Debug, Clone, Default)]
pub struct TrustAnchorStore {
    version: u64,
    certificates: Vec<Certificate>,
    encoded: Vec<Vec<u8>>,
    by_subject: HashMap<Vec<u8>, Vec<usize>>,
}

impl TrustAnchorStore {
    /// Pool of the policy root (if any) followed by the fetched certificates.
    pub fn build(
        policy_root: Option<&Certificate>,
        fetched: impl IntoIterator<Item = Certificate>,
    ) -> TrustResult<Self> {
        Self::build_with_additional(policy_root, &[], fetched)
    }

    /// Pool order: policy root, `additional`, then `fetched`.
    ///
    /// A certificate that occurs more than once keeps its first position.
    pub fn build_with_additional(
        policy_root: Option<&Certificate>,
        additional: &[Certificate],
        fetched: impl IntoIterator<Item = Certificate>,
    ) -> TrustResult<Self> {
        let mut store = Self::default();
        let mut seen = HashSet::new();
        let candidates = policy_root
            .into_iter()
            .chain(additional)
            .cloned()
            .chain(fetched);

        for certificate in candidates {
            let der = certificate.to_der().map_err(|e| {
                TrustError::CertificateError(format!("Failed to encode certificate: {e}"))
            })?;
            if !seen.insert(der.clone()) {
                log::debug!(
                    "Skipping duplicate certificate {}",
                    certificate.tbs_certificate.subject
                );
                continue;
            }
            let subject = certificate.tbs_certificate.subject.to_der().map_err(|e| {
                TrustError::CertificateError(format!("Failed to encode subject: {e}"))
            })?;
            store
                .by_subject
                .entry(subject)
                .or_default()
                .push(store.certificates.len());
            store.certificates.push(certificate);
            store.encoded.push(der);
        }
        Ok(store)
    }

    /// Candidate issuers of a certificate issued by `issuer_name`: every
    /// pooled certificate whose subject equals it.
    #[must_use]
    pub fn certificates_with_issuer(&self, issuer_name: &Name) -> Vec<&Certificate> {
        let Ok(key) = issuer_name.to_der() else {
            return Vec::new();
        };
        self.by_subject
            .get(&key)
            .map(|idx| idx.iter().map(|&i| &self.certificates[i]).collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn certificates(&self) -> &[Certificate] {
        &self.certificates
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }

    /// True if a certificate with identical DER encoding is pooled.
    #[must_use]
    pub fn contains(&self, certificate: &Certificate) -> bool {
        certificate
            .to_der()
            .map(|der| self.encoded.contains(&der))
            .unwrap_or(false)
    }

    /// Zero until the snapshot is published.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[must_use]
    pub fn summaries(&self) -> Vec<CertificateSummary> {
        self.certificates
            .iter()
            .zip(&self.encoded)
            .map(|(cert, der)| CertificateSummary {
                subject: cert.tbs_certificate.subject.to_string(),
                sha256_fingerprint: hex::encode(Sha256::digest(der)),
            })
            .collect()
    }
}

/// Shared holder of the current trust-anchor snapshot.
#[derive(Debug)]
pub struct TrustAnchorHolder {
    current: RwLock<Arc<TrustAnchorStore>>,
}

impl Default for TrustAnchorHolder {
    fn default() -> Self {
        Self::new()
    }
}

impl TrustAnchorHolder {
    /// Holder with an empty version-0 snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(TrustAnchorStore::default())),
        }
    }

    /// Snapshot current at call time.
    #[must_use]
    pub fn current(&self) -> Arc<TrustAnchorStore> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Replace the current snapshot, stamping it with the next version.
    pub fn publish(&self, mut store: TrustAnchorStore) -> Arc<TrustAnchorStore> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        store.version = guard.version + 1;
        let published = Arc::new(store);
        *guard = Arc::clone(&published);
        log::info!(
            "Published trust anchor snapshot v{} with {} certificate(s)",
            published.version,
            published.len()
        );
        published
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use der::Decode;

    fn self_signed(cn: &str) -> Certificate {
        let mut params = rcgen::CertificateParams::new(Vec::<String>::new());
        params.distinguished_name = rcgen::DistinguishedName::new();
        params.distinguished_name.push(rcgen::DnType::CommonName, cn);
        let der = rcgen::Certificate::from_params(params)
            .unwrap()
            .serialize_der()
            .unwrap();
        Certificate::from_der(&der).unwrap()
    }

    #[test]
    fn build_orders_root_additional_fetched_and_drops_duplicates() {
        let root = self_signed("Policy Root");
        let extra = self_signed("Local CA");
        let listed = self_signed("Listed CA");
        let store = TrustAnchorStore::build_with_additional(
            Some(&root),
            std::slice::from_ref(&extra),
            vec![listed.clone(), root.clone()],
        )
        .unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(store.certificates()[0], root);
        assert_eq!(store.certificates()[1], extra);
        assert_eq!(store.certificates()[2], listed);
        assert!(store.contains(&listed));
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn issuer_lookup_matches_subject() {
        let root = self_signed("Policy Root");
        let store = TrustAnchorStore::build(Some(&root), Vec::new()).unwrap();
        let found = store.certificates_with_issuer(&root.tbs_certificate.issuer);
        assert_eq!(found, vec![&root]);

        let other = self_signed("Someone Else");
        assert!(store
            .certificates_with_issuer(&other.tbs_certificate.subject)
            .is_empty());
        assert!(!store.contains(&other));
    }

    #[test]
    fn summaries_carry_sha256_fingerprints() {
        let root = self_signed("Policy Root");
        let store = TrustAnchorStore::build(Some(&root), Vec::new()).unwrap();
        let summary = &store.summaries()[0];
        assert!(summary.subject.contains("Policy Root"));
        assert_eq!(summary.sha256_fingerprint.len(), 64);
    }

    #[test]
    fn holder_versions_increase_and_old_snapshots_stay_valid() {
        let holder = TrustAnchorHolder::new();
        let initial = holder.current();
        assert_eq!(initial.version(), 0);
        assert!(initial.is_empty());

        let root = self_signed("Policy Root");
        let first = holder.publish(TrustAnchorStore::build(Some(&root), Vec::new()).unwrap());
        let second = holder.publish(TrustAnchorStore::default());

        assert_eq!(first.version(), 1);
        assert_eq!(second.version(), 2);
        assert_eq!(holder.current().version(), 2);
        assert_eq!(first.len(), 1);
        assert!(initial.is_empty());
    }
}
