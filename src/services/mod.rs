//! Service layer module root.
//! Stateless parsers and resolvers plus the trust-anchor snapshot store.

pub mod attribute_resolver;
pub mod cert_source;
pub mod cms_extractor;
pub mod subject_reader;
pub mod trust_anchor_store;
pub mod trust_list_fetcher;
pub mod value_decoder;

pub use attribute_resolver::ExtensionAttributeResolver;
pub use cert_source::{load_certificate, load_trusted_folder};
pub use cms_extractor::{CmsCertificateExtractor, ExtractedCertificateSet, SkippedEntry};
pub use subject_reader::{select_tbs_field, CertificateAttributeReader, TbsField};
pub use trust_anchor_store::{CertificateSummary, TrustAnchorHolder, TrustAnchorStore};
pub use trust_list_fetcher::{resolve_location, TrustListFetcher};
pub use value_decoder::MultiTypeValueDecoder;
