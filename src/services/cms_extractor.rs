//! Certificate extraction from a published CMS `SignedData` trust list.
//!
//! ```text
//! ContentInfo ::= SEQUENCE { contentType, [0] EXPLICIT content }
//! SignedData ::= SEQUENCE {
//!     version, digestAlgorithms SET, encapContentInfo SEQUENCE,
//!     certificates [0] IMPLICIT CertificateSet OPTIONAL,
//!     crls         [1] IMPLICIT RevocationInfoChoices OPTIONAL,
//!     signerInfos  SET }
//! ```
//!
//! Input must be DER. BER-only forms such as indefinite lengths are not
//! decoded, and a trust list using them fails with `FormatError`.
//!
//! Only the envelope is strict. Entries of the certificate set are decoded
//! one by one; an entry that is not a decodable X.509 certificate is logged
//! and skipped without aborting the batch.
//!
//! The `SignedData` signature, if any, is NOT verified. Trust in the
//! extracted certificates rests on the location having been published in
//! the SubjectInformationAccess extension of an already trusted policy
//! root. An unsigned `SignedData` (empty `signerInfos`) is accepted.

use crate::domain::asn1::{children, context_number, expect_tag, is_constructed_context};
use crate::domain::constants::ID_SIGNED_DATA;
use crate::infra::error::{TrustError, TrustResult};
use cms::content_info::ContentInfo;
use der::asn1::AnyRef;
use der::{Decode, Encode, Tag, Tagged};
use x509_cert::Certificate;

/// An entry of the certificate set that could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Zero-based position in the encoded certificate set.
    pub index: usize,
    pub reason: String,
}

/// Certificates carried by a trust list, in encoding order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedCertificateSet {
    certificates: Vec<Certificate>,
    skipped: Vec<SkippedEntry>,
}

impl ExtractedCertificateSet {
    #[must_use]
    pub fn new(certificates: Vec<Certificate>) -> Self {
        Self {
            certificates,
            skipped: Vec::new(),
        }
    }

    #[must_use]
    pub fn certificates(&self) -> &[Certificate] {
        &self.certificates
    }

    #[must_use]
    pub fn skipped(&self) -> &[SkippedEntry] {
        &self.skipped
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Certificate> {
        self.certificates.iter()
    }

    #[must_use]
    pub fn into_certificates(self) -> Vec<Certificate> {
        self.certificates
    }
}

impl IntoIterator for ExtractedCertificateSet {
    type Item = Certificate;
    type IntoIter = std::vec::IntoIter<Certificate>;

    fn into_iter(self) -> Self::IntoIter {
        self.certificates.into_iter()
    }
}

pub struct CmsCertificateExtractor;

impl CmsCertificateExtractor {
    /// Extract the embedded certificate set of a DER `ContentInfo`.
    ///
    /// Fails with `FormatError` only when the envelope itself is unusable.
    pub fn extract(bytes: &[u8]) -> TrustResult<ExtractedCertificateSet> {
        let content_info = ContentInfo::from_der(bytes)
            .map_err(|e| TrustError::FormatError(format!("ContentInfo: {e}")))?;
        if content_info.content_type != ID_SIGNED_DATA {
            return Err(TrustError::FormatError(format!(
                "Illegal content type {} (expected id-signedData {ID_SIGNED_DATA})",
                content_info.content_type
            )));
        }

        let signed_data = &content_info.content;
        if signed_data.tag() != Tag::Sequence {
            return Err(TrustError::FormatError(format!(
                "SignedData: expected SEQUENCE, found {}",
                signed_data.tag()
            )));
        }
        let fields = children(signed_data.value())
            .map_err(|e| TrustError::FormatError(format!("SignedData: {e}")))?;
        let Some(certificate_set) = Self::certificate_field(&fields)? else {
            log::debug!("SignedData carries no certificates field");
            return Ok(ExtractedCertificateSet::default());
        };

        let entries = children(certificate_set.value())
            .map_err(|e| TrustError::FormatError(format!("SignedData certificates: {e}")))?;

        let mut extracted = ExtractedCertificateSet::default();
        for (index, entry) in entries.into_iter().enumerate() {
            match Self::decode_entry(entry) {
                Ok(certificate) => {
                    log::trace!(
                        "Added certificate {} for {}",
                        extracted.certificates.len() + 1,
                        certificate.tbs_certificate.subject
                    );
                    extracted.certificates.push(certificate);
                }
                Err(reason) => {
                    log::warn!("Unable to decode certificate {index} from signed data: {reason}");
                    extracted.skipped.push(SkippedEntry { index, reason });
                }
            }
        }

        log::debug!(
            "Extracted {} certificate(s) from trust list, skipped {}",
            extracted.certificates.len(),
            extracted.skipped.len()
        );
        Ok(extracted)
    }

    /// Validate the leading SignedData fields and return `[0] certificates`.
    fn certificate_field<'a>(fields: &[AnyRef<'a>]) -> TrustResult<Option<AnyRef<'a>>> {
        let fixed = [
            (Tag::Integer, "SignedData version"),
            (Tag::Set, "SignedData digestAlgorithms"),
            (Tag::Sequence, "SignedData encapContentInfo"),
        ];
        for (idx, (tag, what)) in fixed.iter().enumerate() {
            let field = fields
                .get(idx)
                .ok_or_else(|| TrustError::FormatError(format!("{what}: missing")))?;
            expect_tag(*field, *tag, what).map_err(TrustError::FormatError)?;
        }

        Ok(fields
            .get(fixed.len())
            .copied()
            .filter(|f| is_constructed_context(f.tag(), 0)))
    }

    fn decode_entry(entry: AnyRef<'_>) -> Result<Certificate, String> {
        if entry.tag() != Tag::Sequence {
            return Err(match context_number(entry.tag()) {
                Some(n) => format!("unsupported CertificateChoices alternative [{n}]"),
                None => format!("expected SEQUENCE, found {}", entry.tag()),
            });
        }
        let der = entry.to_der().map_err(|e| e.to_string())?;
        Certificate::from_der(&der).map_err(|e| e.to_string())
    }
}
