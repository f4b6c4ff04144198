//! Shared fixtures for integration tests: generated certificates and
//! hand-assembled DER for CMS trust lists and certificate extensions.

#![allow(dead_code)]

use der::Decode;
use rcgen::{CertificateParams, CustomExtension, DistinguishedName, DnType, SanType};
use x509_cert::Certificate;

pub const OID_SIA: [u64; 9] = [1, 3, 6, 1, 5, 5, 7, 1, 11];
pub const OID_SDA: [u64; 4] = [2, 5, 29, 9];
pub const OID_SAN: [u64; 4] = [2, 5, 29, 17];

/// DER TLV with a minimal-length header.
pub fn tlv(tag: u8, content: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    let len = content.len();
    if len < 0x80 {
        out.push(len as u8);
    } else if len <= 0xff {
        out.extend([0x81, len as u8]);
    } else {
        out.extend([0x82, (len >> 8) as u8, len as u8]);
    }
    out.extend_from_slice(content);
    out
}

pub fn oid(dotted: &str) -> Vec<u8> {
    let oid = der::asn1::ObjectIdentifier::new_unwrap(dotted);
    tlv(0x06, oid.as_bytes())
}

/// `ContentInfo { id-signedData, SignedData }` with the given certificate
/// set entries and no signers.
pub fn trust_list(entries: &[Vec<u8>]) -> Vec<u8> {
    let mut signed_data = tlv(0x02, &[0x01]);
    signed_data.extend(tlv(0x31, &[]));
    signed_data.extend(tlv(0x30, &oid("1.2.840.113549.1.7.1")));
    signed_data.extend(tlv(0xA0, &entries.concat()));
    signed_data.extend(tlv(0x31, &[]));

    let mut content_info = oid("1.2.840.113549.1.7.2");
    content_info.extend(tlv(0xA0, &tlv(0x30, &signed_data)));
    tlv(0x30, &content_info)
}

/// SubjectInformationAccess value with one caRepository URI.
pub fn sia_ca_repository(uri: &str) -> Vec<u8> {
    let mut description = oid("1.3.6.1.5.5.7.48.5");
    description.extend(tlv(0x86, uri.as_bytes()));
    tlv(0x30, &tlv(0x30, &description))
}

/// SubjectDirectoryAttributes value with one attribute per `(oid, value)`.
pub fn sda(attributes: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let encoded: Vec<u8> = attributes
        .iter()
        .flat_map(|(attr_oid, value)| {
            let mut attribute = oid(attr_oid);
            attribute.extend(tlv(0x31, value));
            tlv(0x30, &attribute)
        })
        .collect();
    tlv(0x30, &encoded)
}

pub struct CertSpec<'a> {
    pub subject: &'a [(DnType, &'a str)],
    pub sans: Vec<SanType>,
    pub extensions: Vec<CustomExtension>,
}

impl<'a> CertSpec<'a> {
    pub fn subject(subject: &'a [(DnType, &'a str)]) -> Self {
        Self {
            subject,
            sans: Vec::new(),
            extensions: Vec::new(),
        }
    }

    pub fn with_sans(mut self, sans: Vec<SanType>) -> Self {
        self.sans = sans;
        self
    }

    pub fn with_extension(mut self, oid: &[u64], value: Vec<u8>) -> Self {
        self.extensions
            .push(CustomExtension::from_oid_content(oid, value));
        self
    }

    /// Self-signed DER certificate.
    pub fn der(self) -> Vec<u8> {
        let mut params = CertificateParams::new(Vec::<String>::new());
        params.distinguished_name = DistinguishedName::new();
        for (ty, value) in self.subject {
            params.distinguished_name.push(ty.clone(), *value);
        }
        params.subject_alt_names = self.sans;
        params.custom_extensions = self.extensions;
        rcgen::Certificate::from_params(params)
            .expect("generate certificate")
            .serialize_der()
            .expect("serialize certificate")
    }

    pub fn certificate(self) -> Certificate {
        Certificate::from_der(&self.der()).expect("decode generated certificate")
    }
}

pub fn ca(cn: &str) -> Vec<u8> {
    CertSpec::subject(&[(DnType::CommonName, cn)]).der()
}
