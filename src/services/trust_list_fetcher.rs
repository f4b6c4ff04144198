//! Trust-list location and retrieval.
//!
//! A policy root advertises where its trust list is published through a
//! SubjectInformationAccess access description with access method
//! `id-ad-caRepository`.

use crate::adapters::trust_list_http_client::TrustListTransport;
use crate::domain::constants::ID_AD_CA_REPOSITORY;
use crate::domain::types::TrustListUrl;
use crate::infra::error::{TrustError, TrustResult};
use x509_cert::ext::pkix::name::GeneralName;
use x509_cert::ext::pkix::SubjectInfoAccessSyntax;
use x509_cert::Certificate;

const SIA: &str = "SubjectInformationAccess";

pub struct TrustListFetcher<T> {
    transport: T,
}

impl<T: TrustListTransport> TrustListFetcher<T> {
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// CA-repository location published by `policy_root`, if any.
    pub fn resolve_location(&self, policy_root: &Certificate) -> TrustResult<Option<TrustListUrl>> {
        resolve_location(policy_root)
    }

    /// Download raw trust-list bytes. No retry is attempted.
    pub fn fetch(&self, url: &TrustListUrl) -> TrustResult<Vec<u8>> {
        log::info!("Fetching trust list from {url}");
        self.transport.get(url)
    }
}

/// CA-repository location published by `policy_root`, if any.
///
/// An absent extension or a missing CA-repository description is a normal
/// outcome (`Ok(None)`). An undecodable extension, or a CA-repository
/// location that is not an http(s) URI, is an error.
pub fn resolve_location(policy_root: &Certificate) -> TrustResult<Option<TrustListUrl>> {
    let sia = policy_root
        .tbs_certificate
        .get::<SubjectInfoAccessSyntax>()
        .map_err(|e| TrustError::malformed(SIA, e.to_string()))?;
    let Some((_critical, sia)) = sia else {
        log::debug!("The policy root certificate contains no SubjectInformationAccess extension");
        return Ok(None);
    };

    let Some(description) = sia
        .0
        .iter()
        .find(|d| d.access_method == ID_AD_CA_REPOSITORY)
    else {
        log::debug!("No CA repository access description in policy root SIA");
        return Ok(None);
    };

    match &description.access_location {
        GeneralName::UniformResourceIdentifier(uri) => {
            let url = TrustListUrl::new(uri.to_string())
                .map_err(|e| TrustError::malformed(SIA, e.to_string()))?;
            log::debug!("Policy root publishes trust list at {url}");
            Ok(Some(url))
        }
        other => Err(TrustError::malformed(
            SIA,
            format!("CA repository location is not a URI: {other:?}"),
        )),
    }
}
