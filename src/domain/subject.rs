//! Recognized Subject DN attribute types and the per-certificate attribute map.

use der::asn1::ObjectIdentifier;
use std::collections::BTreeMap;
use std::fmt;

/// Closed set of Subject DN attribute types that have a display name.
///
/// Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SubjectDnAttribute {
    CommonName,
    GivenName,
    Surname,
    SerialNumber,
    Pseudonym,
    Title,
    Initials,
    GenerationQualifier,
    Email,
    Organization,
    OrganizationalUnit,
    OrganizationIdentifier,
    Country,
    Locality,
    StateOrProvince,
    Street,
    PostalCode,
    Description,
    DnQualifier,
    DomainComponent,
    UserId,
}

impl SubjectDnAttribute {
    /// Every recognized type, in display order.
    pub const ALL: [SubjectDnAttribute; 21] = [
        SubjectDnAttribute::CommonName,
        SubjectDnAttribute::GivenName,
        SubjectDnAttribute::Surname,
        SubjectDnAttribute::SerialNumber,
        SubjectDnAttribute::Pseudonym,
        SubjectDnAttribute::Title,
        SubjectDnAttribute::Initials,
        SubjectDnAttribute::GenerationQualifier,
        SubjectDnAttribute::Email,
        SubjectDnAttribute::Organization,
        SubjectDnAttribute::OrganizationalUnit,
        SubjectDnAttribute::OrganizationIdentifier,
        SubjectDnAttribute::Country,
        SubjectDnAttribute::Locality,
        SubjectDnAttribute::StateOrProvince,
        SubjectDnAttribute::Street,
        SubjectDnAttribute::PostalCode,
        SubjectDnAttribute::Description,
        SubjectDnAttribute::DnQualifier,
        SubjectDnAttribute::DomainComponent,
        SubjectDnAttribute::UserId,
    ];

    #[must_use]
    pub fn oid(&self) -> ObjectIdentifier {
        ObjectIdentifier::new_unwrap(self.oid_str())
    }

    /// Dotted-decimal OID of this attribute type.
    #[must_use]
    pub fn oid_str(&self) -> &'static str {
        match self {
            SubjectDnAttribute::CommonName => "2.5.4.3",
            SubjectDnAttribute::GivenName => "2.5.4.42",
            SubjectDnAttribute::Surname => "2.5.4.4",
            SubjectDnAttribute::SerialNumber => "2.5.4.5",
            SubjectDnAttribute::Pseudonym => "2.5.4.65",
            SubjectDnAttribute::Title => "2.5.4.12",
            SubjectDnAttribute::Initials => "2.5.4.43",
            SubjectDnAttribute::GenerationQualifier => "2.5.4.44",
            SubjectDnAttribute::Email => "1.2.840.113549.1.9.1",
            SubjectDnAttribute::Organization => "2.5.4.10",
            SubjectDnAttribute::OrganizationalUnit => "2.5.4.11",
            SubjectDnAttribute::OrganizationIdentifier => "2.5.4.97",
            SubjectDnAttribute::Country => "2.5.4.6",
            SubjectDnAttribute::Locality => "2.5.4.7",
            SubjectDnAttribute::StateOrProvince => "2.5.4.8",
            SubjectDnAttribute::Street => "2.5.4.9",
            SubjectDnAttribute::PostalCode => "2.5.4.17",
            SubjectDnAttribute::Description => "2.5.4.13",
            SubjectDnAttribute::DnQualifier => "2.5.4.46",
            SubjectDnAttribute::DomainComponent => "0.9.2342.19200300.100.1.25",
            SubjectDnAttribute::UserId => "0.9.2342.19200300.100.1.1",
        }
    }

    /// Conventional short name (`CN`, `O`, ...).
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        match self {
            SubjectDnAttribute::CommonName => "CN",
            SubjectDnAttribute::GivenName => "GIVENNAME",
            SubjectDnAttribute::Surname => "SURNAME",
            SubjectDnAttribute::SerialNumber => "SERIALNUMBER",
            SubjectDnAttribute::Pseudonym => "PSEUDONYM",
            SubjectDnAttribute::Title => "T",
            SubjectDnAttribute::Initials => "INITIALS",
            SubjectDnAttribute::GenerationQualifier => "GENERATION",
            SubjectDnAttribute::Email => "E",
            SubjectDnAttribute::Organization => "O",
            SubjectDnAttribute::OrganizationalUnit => "OU",
            SubjectDnAttribute::OrganizationIdentifier => "ORGANIZATIONIDENTIFIER",
            SubjectDnAttribute::Country => "C",
            SubjectDnAttribute::Locality => "L",
            SubjectDnAttribute::StateOrProvince => "ST",
            SubjectDnAttribute::Street => "STREET",
            SubjectDnAttribute::PostalCode => "POSTALCODE",
            SubjectDnAttribute::Description => "DESCRIPTION",
            SubjectDnAttribute::DnQualifier => "DN",
            SubjectDnAttribute::DomainComponent => "DC",
            SubjectDnAttribute::UserId => "UID",
        }
    }

    /// Map an OID onto a recognized type; `None` for anything else.
    #[must_use]
    pub fn from_oid(oid: &ObjectIdentifier) -> Option<Self> {
        let oid = oid.to_string();
        Self::ALL.into_iter().find(|attr| attr.oid_str() == oid)
    }

    /// Position in the display listing.
    #[must_use]
    pub fn display_order(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for SubjectDnAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// One `AttributeTypeAndValue` from the subject, in encoding order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectEntry {
    pub oid: ObjectIdentifier,
    pub value: String,
}

impl SubjectEntry {
    /// Recognized type of this entry, if any.
    #[must_use]
    pub fn attribute(&self) -> Option<SubjectDnAttribute> {
        SubjectDnAttribute::from_oid(&self.oid)
    }

    /// Short name for recognized types, dotted OID otherwise.
    #[must_use]
    pub fn label(&self) -> String {
        self.attribute()
            .map_or_else(|| self.oid.to_string(), |a| a.short_name().to_string())
    }
}

/// Recognized subject attributes of one certificate.
///
/// Repeated types keep the last occurrence. Every entry, recognized or not,
/// stays available in encoding order through [`SubjectAttributeMap::entries`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectAttributeMap {
    values: BTreeMap<SubjectDnAttribute, String>,
    entries: Vec<SubjectEntry>,
}

impl SubjectAttributeMap {
    #[must_use]
    pub fn from_entries(entries: Vec<SubjectEntry>) -> Self {
        let mut values = BTreeMap::new();
        for entry in &entries {
            if let Some(attr) = entry.attribute() {
                values.insert(attr, entry.value.clone());
            }
        }
        Self { values, entries }
    }

    #[must_use]
    pub fn get(&self, attribute: SubjectDnAttribute) -> Option<&str> {
        self.values.get(&attribute).map(String::as_str)
    }

    /// Number of recognized types present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Recognized attributes in display order.
    pub fn iter(&self) -> impl Iterator<Item = (SubjectDnAttribute, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// All subject entries in encoding order.
    #[must_use]
    pub fn entries(&self) -> &[SubjectEntry] {
        &self.entries
    }

    /// Entries whose OID is not a recognized type.
    pub fn unrecognized(&self) -> impl Iterator<Item = &SubjectEntry> {
        self.entries.iter().filter(|e| e.attribute().is_none())
    }

    /// Value by raw OID, last occurrence wins. Covers unrecognized OIDs too.
    #[must_use]
    pub fn value_by_oid(&self, oid: &ObjectIdentifier) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|e| &e.oid == oid)
            .map(|e| e.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(oid: &str, value: &str) -> SubjectEntry {
        SubjectEntry {
            oid: ObjectIdentifier::new_unwrap(oid),
            value: value.to_string(),
        }
    }

    #[test]
    fn oid_round_trip_for_every_type() {
        for attr in SubjectDnAttribute::ALL {
            assert_eq!(SubjectDnAttribute::from_oid(&attr.oid()), Some(attr));
        }
        assert_eq!(
            SubjectDnAttribute::from_oid(&ObjectIdentifier::new_unwrap("1.2.3.4")),
            None
        );
    }

    #[test]
    fn display_order_follows_declaration() {
        for (idx, attr) in SubjectDnAttribute::ALL.iter().enumerate() {
            assert_eq!(attr.display_order(), idx);
        }
    }

    #[test]
    fn last_occurrence_wins() {
        let map = SubjectAttributeMap::from_entries(vec![
            entry("2.5.4.11", "First unit"),
            entry("2.5.4.3", "Nisse Hult"),
            entry("2.5.4.11", "Second unit"),
        ]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(SubjectDnAttribute::OrganizationalUnit), Some("Second unit"));
        assert_eq!(map.entries().len(), 3);
    }

    #[test]
    fn unrecognized_oids_kept_for_display_only() {
        let map = SubjectAttributeMap::from_entries(vec![
            entry("2.5.4.6", "SE"),
            entry("1.2.752.201.3.1", "Private value"),
        ]);
        assert_eq!(map.len(), 1);
        let unknown: Vec<_> = map.unrecognized().collect();
        assert_eq!(unknown.len(), 1);
        assert_eq!(unknown[0].label(), "1.2.752.201.3.1");
        assert_eq!(
            map.value_by_oid(&ObjectIdentifier::new_unwrap("1.2.752.201.3.1")),
            Some("Private value")
        );
    }

    #[test]
    fn iteration_is_in_display_order() {
        let map = SubjectAttributeMap::from_entries(vec![
            entry("2.5.4.6", "SE"),
            entry("2.5.4.10", "Org"),
            entry("2.5.4.3", "Test User"),
        ]);
        let order: Vec<_> = map.iter().map(|(a, _)| a).collect();
        assert_eq!(
            order,
            vec![
                SubjectDnAttribute::CommonName,
                SubjectDnAttribute::Organization,
                SubjectDnAttribute::Country
            ]
        );
    }
}
