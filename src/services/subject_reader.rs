//! Subject DN extraction straight from certificate DER.
//!
//! The reader walks `Certificate → TBSCertificate → subject` at the TLV
//! level instead of going through a full X.509 decoder, so certificates with
//! unusual-but-harmless encodings elsewhere in the TBS still yield a subject.
//!
//! ```text
//! TBSCertificate ::= SEQUENCE {
//!     version         [0]  EXPLICIT Version DEFAULT v1,
//!     serialNumber         CertificateSerialNumber,
//!     signature            AlgorithmIdentifier,
//!     issuer               Name,
//!     validity             Validity,
//!     subject              Name,
//!     subjectPublicKeyInfo SubjectPublicKeyInfo,
//!     ... }
//! ```
//!
//! `version` is optional, so the subject is not at a fixed index. The field
//! selector classifies the leading context-specific elements as the optional
//! prefix and then matches the fixed fields by expected tag.

use crate::domain::asn1::{children_of, context_number, decode_tlv, expect_tag, is_constructed_context, read_oid};
use crate::domain::subject::{SubjectAttributeMap, SubjectEntry};
use crate::infra::error::{TrustError, TrustResult};
use crate::services::value_decoder::MultiTypeValueDecoder;
use der::asn1::AnyRef;
use der::{Tag, Tagged};

/// Fixed (non-optional, non-extension) fields of a TBSCertificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TbsField {
    SerialNumber,
    Signature,
    Issuer,
    Validity,
    Subject,
    SubjectPublicKeyInfo,
}

impl TbsField {
    const FIXED: [TbsField; 6] = [
        TbsField::SerialNumber,
        TbsField::Signature,
        TbsField::Issuer,
        TbsField::Validity,
        TbsField::Subject,
        TbsField::SubjectPublicKeyInfo,
    ];

    fn position(self) -> usize {
        self as usize
    }

    fn expected_tag(self) -> Tag {
        match self {
            TbsField::SerialNumber => Tag::Integer,
            _ => Tag::Sequence,
        }
    }

    fn name(self) -> &'static str {
        match self {
            TbsField::SerialNumber => "serialNumber",
            TbsField::Signature => "signature",
            TbsField::Issuer => "issuer",
            TbsField::Validity => "validity",
            TbsField::Subject => "subject",
            TbsField::SubjectPublicKeyInfo => "subjectPublicKeyInfo",
        }
    }
}

/// Pick a fixed field out of the TBSCertificate's top-level elements.
///
/// Only `[0] version` may precede the fixed fields. Every fixed field up to
/// and including `wanted` must carry its expected tag.
pub fn select_tbs_field<'a>(fields: &[AnyRef<'a>], wanted: TbsField) -> Result<AnyRef<'a>, String> {
    let prefix = fields
        .iter()
        .take_while(|f| context_number(f.tag()).is_some())
        .count();
    match prefix {
        0 => {}
        1 if is_constructed_context(fields[0].tag(), 0) => {}
        _ => {
            return Err(format!(
                "TBSCertificate: unexpected leading tagged element {}",
                fields[prefix.saturating_sub(1)].tag()
            ));
        }
    }

    for field in TbsField::FIXED.iter().take(wanted.position() + 1) {
        let element = fields
            .get(prefix + field.position())
            .ok_or_else(|| format!("TBSCertificate: missing {}", field.name()))?;
        expect_tag(*element, field.expected_tag(), field.name())?;
    }
    Ok(fields[prefix + wanted.position()])
}

pub struct CertificateAttributeReader;

impl CertificateAttributeReader {
    /// Recognized subject attributes of a DER certificate.
    ///
    /// All-or-nothing: any structural problem in the certificate, the TBS or
    /// the subject Name fails the whole call with `AttributeParseError`.
    pub fn read_subject_attributes(certificate_der: &[u8]) -> TrustResult<SubjectAttributeMap> {
        let entries = Self::read_subject_entries(certificate_der)?;
        Ok(SubjectAttributeMap::from_entries(entries))
    }

    /// Every subject `AttributeTypeAndValue`, in encoding order.
    pub fn read_subject_entries(certificate_der: &[u8]) -> TrustResult<Vec<SubjectEntry>> {
        Self::locate_and_parse_subject(certificate_der).map_err(TrustError::AttributeParseError)
    }

    fn locate_and_parse_subject(certificate_der: &[u8]) -> Result<Vec<SubjectEntry>, String> {
        let certificate = decode_tlv(certificate_der).map_err(|e| format!("Certificate: {e}"))?;
        let certificate_fields = children_of(certificate, Tag::Sequence, "Certificate")?;
        let tbs = certificate_fields
            .first()
            .ok_or_else(|| "Certificate: empty SEQUENCE".to_string())?;
        let tbs_fields = children_of(*tbs, Tag::Sequence, "TBSCertificate")?;
        let subject = select_tbs_field(&tbs_fields, TbsField::Subject)?;
        let entries = parse_name(subject)?;
        log::trace!("Read {} subject attribute(s)", entries.len());
        Ok(entries)
    }
}

/// Flatten a `Name` (SEQUENCE OF RDN SET OF AttributeTypeAndValue).
pub(crate) fn parse_name(name: AnyRef<'_>) -> Result<Vec<SubjectEntry>, String> {
    let mut entries = Vec::new();
    for rdn in children_of(name, Tag::Sequence, "Name")? {
        let atvs = children_of(rdn, Tag::Set, "RelativeDistinguishedName")?;
        if atvs.is_empty() {
            return Err("RelativeDistinguishedName: empty SET".to_string());
        }
        for atv in atvs {
            let parts = children_of(atv, Tag::Sequence, "AttributeTypeAndValue")?;
            let [oid, value] = parts.as_slice() else {
                return Err(format!(
                    "AttributeTypeAndValue: expected 2 elements, found {}",
                    parts.len()
                ));
            };
            entries.push(SubjectEntry {
                oid: read_oid(*oid, "AttributeTypeAndValue type")?,
                value: MultiTypeValueDecoder::decode_any(*value),
            });
        }
    }
    Ok(entries)
}
