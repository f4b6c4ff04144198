//! Strongly-typed values passed between the trust-list and attribute services.

use crate::infra::error::{TrustError, TrustResult};
use der::asn1::ObjectIdentifier;
use std::fmt;
use std::str::FromStr;

use super::constants::GENERAL_NAME_MAX_TAG;

/// Validated http(s) location of a published trust list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrustListUrl(String);

impl TrustListUrl {
    /// Create a new `TrustListUrl` after validation
    pub fn new(url: impl AsRef<str>) -> TrustResult<Self> {
        let url = url.as_ref().trim();
        let parsed = url::Url::parse(url)
            .map_err(|e| TrustError::InvalidInput(format!("Invalid trust list URL '{url}': {e}")))?;
        match parsed.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(TrustError::InvalidInput(format!(
                    "Unsupported trust list URL scheme '{scheme}' (must be http or https): {url}"
                )));
            }
        }
        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(TrustError::InvalidInput(format!(
                "Trust list URL has no host: {url}"
            )));
        }
        Ok(TrustListUrl(url.to_string()))
    }

    /// Get the URL as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for TrustListUrl {
    type Err = TrustError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for TrustListUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a referenced attribute value lives in a certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeSource {
    /// Subject DN relative distinguished names
    Rdn,
    /// SubjectAlternativeName extension
    San,
    /// SubjectDirectoryAttributes extension
    Sda,
}

impl AttributeSource {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeSource::Rdn => "rdn",
            AttributeSource::San => "san",
            AttributeSource::Sda => "sda",
        }
    }
}

impl FromStr for AttributeSource {
    type Err = TrustError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rdn" => Ok(AttributeSource::Rdn),
            "san" => Ok(AttributeSource::San),
            "sda" => Ok(AttributeSource::Sda),
            other => Err(TrustError::InvalidInput(format!(
                "Unknown attribute source '{other}' (expected rdn, san or sda)"
            ))),
        }
    }
}

impl fmt::Display for AttributeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed reference key: an attribute OID, or a GeneralName tag number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReferenceKey {
    Oid(ObjectIdentifier),
    GeneralNameTag(u32),
}

/// A `(source, key)` pair naming one attribute value in a certificate.
///
/// RDN and SDA references are keyed by attribute OID, SAN references by the
/// GeneralName CHOICE tag number (`"6"` = URI, `"2"` = DNS name, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeReference {
    source: AttributeSource,
    key: ReferenceKey,
}

impl AttributeReference {
    /// Create a reference, validating `key` against `source`.
    pub fn new(source: AttributeSource, key: impl AsRef<str>) -> TrustResult<Self> {
        let key = key.as_ref().trim();
        let key = match source {
            AttributeSource::Rdn | AttributeSource::Sda => {
                ReferenceKey::Oid(ObjectIdentifier::new(key).map_err(|e| {
                    TrustError::InvalidInput(format!(
                        "{source} reference key '{key}' is not an OID: {e}"
                    ))
                })?)
            }
            AttributeSource::San => {
                let tag: u32 = key.parse().map_err(|_| {
                    TrustError::InvalidInput(format!(
                        "san reference key '{key}' is not a GeneralName tag number"
                    ))
                })?;
                ReferenceKey::GeneralNameTag(tag)
            }
        };
        Ok(Self { source, key })
    }

    /// RDN reference for an attribute OID.
    #[must_use]
    pub fn rdn(oid: ObjectIdentifier) -> Self {
        Self {
            source: AttributeSource::Rdn,
            key: ReferenceKey::Oid(oid),
        }
    }

    /// SAN reference for a GeneralName tag number.
    #[must_use]
    pub fn san(tag: u32) -> Self {
        Self {
            source: AttributeSource::San,
            key: ReferenceKey::GeneralNameTag(tag),
        }
    }

    /// SubjectDirectoryAttributes reference for an attribute OID.
    #[must_use]
    pub fn sda(oid: ObjectIdentifier) -> Self {
        Self {
            source: AttributeSource::Sda,
            key: ReferenceKey::Oid(oid),
        }
    }

    #[must_use]
    pub fn source(&self) -> AttributeSource {
        self.source
    }

    #[must_use]
    pub fn key(&self) -> &ReferenceKey {
        &self.key
    }

    /// True when a SAN tag key lies outside the GeneralName CHOICE range.
    /// Such references are legal but can never match.
    #[must_use]
    pub fn is_unmatchable(&self) -> bool {
        matches!(
            self.key,
            ReferenceKey::GeneralNameTag(tag) if tag > u32::from(GENERAL_NAME_MAX_TAG)
        )
    }
}

impl fmt::Display for AttributeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            ReferenceKey::Oid(oid) => write!(f, "{}:{oid}", self.source),
            ReferenceKey::GeneralNameTag(tag) => write!(f, "{}:{tag}", self.source),
        }
    }
}
