//! Sigval Trust Library
//!
//! Trust-list resolution and certificate attribute extraction for a
//! signature validation service. A policy root certificate points, through
//! its SubjectInformationAccess extension, at a CMS `SignedData` trust list;
//! the certificates it carries are pooled with the root into a versioned
//! trust-anchor snapshot. Subject DN, SubjectAlternativeName and
//! SubjectDirectoryAttributes values are decoded for display.
//!
//! Layers:
//! - `domain`: OIDs, DER walking helpers, attribute and reference types
//! - `services`: stateless decoders, resolvers and the snapshot store
//! - `adapters`: HTTP transport for trust-list retrieval
//! - `pipelines`: the reload cycle
//! - `infra`: configuration and error types

pub mod adapters;
pub mod domain;
pub mod infra;
pub mod pipelines;
pub mod services;

pub use adapters::trust_list_http_client::{HttpTrustListClient, TrustListTransport};
pub use domain::subject::{SubjectAttributeMap, SubjectDnAttribute, SubjectEntry};
pub use domain::types::{AttributeReference, AttributeSource, TrustListUrl};
pub use infra::config::{ConfigManager, TrustConfiguration};
pub use infra::error::{TrustError, TrustResult};
pub use pipelines::reload::TrustAnchorReloader;
pub use services::{
    CertificateAttributeReader, CmsCertificateExtractor, ExtensionAttributeResolver,
    MultiTypeValueDecoder, TrustAnchorHolder, TrustAnchorStore, TrustListFetcher,
};
