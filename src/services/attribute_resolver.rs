//! Attribute lookup by `(source, key)` reference.
//!
//! - `rdn`: subject DN attribute, keyed by attribute OID.
//! - `san`: SubjectAlternativeName entries, keyed by GeneralName tag number.
//!   All matching entries are joined with `,`.
//! - `sda`: SubjectDirectoryAttributes, keyed by attribute OID. The first
//!   value of the first matching attribute is returned.
//!
//! An absent extension or value is `Ok(None)`. An extension that is present
//! but cannot be parsed is `MalformedExtension`.

use crate::domain::asn1::{children_of, context_number, decode_tlv, read_oid};
use crate::domain::constants::{
    GENERAL_NAME_DIRECTORY, GENERAL_NAME_DNS, GENERAL_NAME_IP_ADDRESS, GENERAL_NAME_REGISTERED_ID,
    GENERAL_NAME_RFC822, GENERAL_NAME_URI, ID_CE_SUBJECT_ALT_NAME,
    ID_CE_SUBJECT_DIRECTORY_ATTRIBUTES,
};
use crate::domain::subject::SubjectDnAttribute;
use crate::domain::types::{AttributeReference, AttributeSource, ReferenceKey};
use crate::infra::error::{TrustError, TrustResult};
use crate::services::subject_reader::{parse_name, CertificateAttributeReader};
use crate::services::value_decoder::MultiTypeValueDecoder;
use der::asn1::{AnyRef, ObjectIdentifier};
use der::{Encode, Tag, Tagged};
use std::net::{Ipv4Addr, Ipv6Addr};
use x509_cert::Certificate;

const SAN: &str = "SubjectAlternativeName";
const SDA: &str = "SubjectDirectoryAttributes";

pub struct ExtensionAttributeResolver;

impl ExtensionAttributeResolver {
    /// Resolve `reference` against `certificate`.
    pub fn resolve(
        certificate: &Certificate,
        reference: &AttributeReference,
    ) -> TrustResult<Option<String>> {
        let value = match (reference.source(), reference.key()) {
            (AttributeSource::Rdn, ReferenceKey::Oid(oid)) => Self::resolve_rdn(certificate, oid)?,
            (AttributeSource::San, ReferenceKey::GeneralNameTag(tag)) => {
                let value = match extension_value(certificate, &ID_CE_SUBJECT_ALT_NAME) {
                    Some(ext) => resolve_san(ext, *tag)?,
                    None => None,
                };
                if reference.is_unmatchable() {
                    log::debug!("GeneralName tag {tag} is outside the CHOICE range, no match");
                }
                value
            }
            (AttributeSource::Sda, ReferenceKey::Oid(oid)) => {
                match extension_value(certificate, &ID_CE_SUBJECT_DIRECTORY_ATTRIBUTES) {
                    Some(ext) => resolve_sda(ext, oid)?,
                    None => None,
                }
            }
            (source, key) => {
                return Err(TrustError::InvalidInput(format!(
                    "Reference key {key:?} does not apply to source {source}"
                )))
            }
        };
        log::trace!("Resolved {reference}: {value:?}");
        Ok(value)
    }

    fn resolve_rdn(certificate: &Certificate, oid: &ObjectIdentifier) -> TrustResult<Option<String>> {
        let Some(attribute) = SubjectDnAttribute::from_oid(oid) else {
            log::debug!("{oid} is not a recognized subject attribute type");
            return Ok(None);
        };
        let der = certificate
            .to_der()
            .map_err(|e| TrustError::CertificateError(format!("Failed to encode certificate: {e}")))?;
        let attributes = CertificateAttributeReader::read_subject_attributes(&der)?;
        Ok(attributes.get(attribute).map(str::to_string))
    }
}

/// Raw `extnValue` octets of the first extension with `oid`.
fn extension_value<'a>(certificate: &'a Certificate, oid: &ObjectIdentifier) -> Option<&'a [u8]> {
    let value = certificate
        .tbs_certificate
        .extensions
        .as_deref()
        .unwrap_or_default()
        .iter()
        .find(|ext| &ext.extn_id == oid)
        .map(|ext| ext.extn_value.as_bytes());
    if value.is_none() {
        log::debug!("Certificate has no {oid} extension");
    }
    value
}

/// Matching GeneralNames of a DER `GeneralNames` value, joined with `,`.
///
/// The whole extension is validated before matching, so a malformed SAN is
/// reported even for tags no GeneralName can carry.
pub(crate) fn resolve_san(extension_value: &[u8], tag: u32) -> TrustResult<Option<String>> {
    let names = decode_tlv(extension_value)
        .map_err(|e| TrustError::malformed(SAN, e.to_string()))
        .and_then(|seq| {
            children_of(seq, Tag::Sequence, "GeneralNames").map_err(|e| TrustError::malformed(SAN, e))
        })?;

    let mut matches = Vec::new();
    for name in names {
        let Some(number) = context_number(name.tag()) else {
            return Err(TrustError::malformed(
                SAN,
                format!("GeneralName: expected context-specific tag, found {}", name.tag()),
            ));
        };
        if u32::from(number) == tag {
            matches.push(render_general_name(number, name).map_err(|e| TrustError::malformed(SAN, e))?);
        }
    }

    Ok((!matches.is_empty()).then(|| matches.join(",")))
}

fn render_general_name(number: u8, name: AnyRef<'_>) -> Result<String, String> {
    let raw = name.value();
    match number {
        GENERAL_NAME_RFC822 | GENERAL_NAME_DNS | GENERAL_NAME_URI => {
            Ok(MultiTypeValueDecoder::decode(Tag::Ia5String, raw))
        }
        GENERAL_NAME_IP_ADDRESS => Ok(match raw.len() {
            4 => Ipv4Addr::from([raw[0], raw[1], raw[2], raw[3]]).to_string(),
            16 => {
                let mut octets = [0u8; 16];
                octets.copy_from_slice(raw);
                Ipv6Addr::from(octets).to_string()
            }
            _ => format!("#{}", hex::encode(raw)),
        }),
        GENERAL_NAME_REGISTERED_ID => ObjectIdentifier::from_bytes(raw)
            .map(|oid| oid.to_string())
            .map_err(|e| format!("registeredID: {e}")),
        GENERAL_NAME_DIRECTORY => {
            let inner = decode_tlv(raw).map_err(|e| format!("directoryName: {e}"))?;
            let entries = parse_name(inner)?;
            Ok(entries
                .iter()
                .map(|e| format!("{}={}", e.label(), e.value))
                .collect::<Vec<_>>()
                .join(", "))
        }
        _ => Ok(MultiTypeValueDecoder::decode_any(name)),
    }
}

/// First value of the first attribute with `oid` in a DER
/// `SubjectDirectoryAttributes` value.
pub(crate) fn resolve_sda(extension_value: &[u8], oid: &ObjectIdentifier) -> TrustResult<Option<String>> {
    let malformed = |e: String| TrustError::malformed(SDA, e);
    let seq = decode_tlv(extension_value).map_err(|e| malformed(e.to_string()))?;
    for attribute in children_of(seq, Tag::Sequence, "SubjectDirectoryAttributes").map_err(malformed)? {
        let parts = children_of(attribute, Tag::Sequence, "Attribute").map_err(malformed)?;
        let [attr_type, values] = parts.as_slice() else {
            return Err(malformed(format!(
                "Attribute: expected 2 elements, found {}",
                parts.len()
            )));
        };
        if read_oid(*attr_type, "Attribute type").map_err(malformed)? != *oid {
            continue;
        }
        let values = children_of(*values, Tag::Set, "Attribute values").map_err(malformed)?;
        match values.first() {
            Some(first) => return Ok(Some(MultiTypeValueDecoder::decode_any(*first))),
            None => log::debug!("Directory attribute {oid} has no values"),
        }
    }
    Ok(None)
}
