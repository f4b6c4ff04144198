//! Centralized OIDs and ASN.1 tag numbers used by the trust-list and
//! attribute parsers. Keep this intentionally small; only broadly reused
//! literals should live here.

use der::asn1::ObjectIdentifier;

// === CMS ===

/// CMS `id-signedData` content type (1.2.840.113549.1.7.2)
pub const ID_SIGNED_DATA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.7.2");

// === X.509 extensions ===

/// SubjectInformationAccess extension (1.3.6.1.5.5.7.1.11)
pub const ID_PE_SUBJECT_INFO_ACCESS: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.1.11");

/// `id-ad-caRepository` access method (1.3.6.1.5.5.7.48.5)
pub const ID_AD_CA_REPOSITORY: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.48.5");

/// SubjectAlternativeName extension (2.5.29.17)
pub const ID_CE_SUBJECT_ALT_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.17");

/// SubjectDirectoryAttributes extension (2.5.29.9)
pub const ID_CE_SUBJECT_DIRECTORY_ATTRIBUTES: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("2.5.29.9");

// === Subject directory attributes (RFC 3739) ===

/// `id-pda-dateOfBirth` (1.3.6.1.5.5.7.9.1)
pub const ID_PDA_DATE_OF_BIRTH: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.9.1");

/// `id-pda-gender` (1.3.6.1.5.5.7.9.3)
pub const ID_PDA_GENDER: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.9.3");

/// `id-pda-countryOfCitizenship` (1.3.6.1.5.5.7.9.4)
pub const ID_PDA_COUNTRY_OF_CITIZENSHIP: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.9.4");

// === GeneralName CHOICE tag numbers ===

pub const GENERAL_NAME_OTHER_NAME: u8 = 0;
pub const GENERAL_NAME_RFC822: u8 = 1;
pub const GENERAL_NAME_DNS: u8 = 2;
pub const GENERAL_NAME_X400_ADDRESS: u8 = 3;
pub const GENERAL_NAME_DIRECTORY: u8 = 4;
pub const GENERAL_NAME_EDI_PARTY: u8 = 5;
pub const GENERAL_NAME_URI: u8 = 6;
pub const GENERAL_NAME_IP_ADDRESS: u8 = 7;
pub const GENERAL_NAME_REGISTERED_ID: u8 = 8;

/// Highest valid GeneralName CHOICE tag number.
pub const GENERAL_NAME_MAX_TAG: u8 = GENERAL_NAME_REGISTERED_ID;
