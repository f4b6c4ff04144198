//! Loading certificates from local files.

use crate::infra::error::{TrustError, TrustResult};
use der::Decode;
use std::fs;
use std::path::{Path, PathBuf};
use x509_cert::Certificate;

const TRUSTED_EXTENSIONS: [&str; 2] = ["cer", "crt"];

/// First certificate of a PEM or DER file.
pub fn load_certificate(path: &Path) -> TrustResult<Certificate> {
    let bytes = fs::read(path)
        .map_err(|e| TrustError::IoError(format!("Failed to read {}: {e}", path.display())))?;
    parse_certificates(&bytes)
        .map_err(|e| TrustError::CertificateError(format!("{}: {e}", path.display())))?
        .into_iter()
        .next()
        .ok_or_else(|| {
            TrustError::CertificateError(format!("{}: no certificate found", path.display()))
        })
}

/// Every certificate in the `.cer`/`.crt` files of `dir`, by file name.
///
/// Files that cannot be read or parsed are logged and skipped.
pub fn load_trusted_folder(dir: &Path) -> TrustResult<Vec<Certificate>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| TrustError::IoError(format!("Failed to list {}: {e}", dir.display())))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && has_trusted_extension(path))
        .collect();
    files.sort();

    let mut certificates = Vec::new();
    for file in files {
        let loaded = fs::read(&file)
            .map_err(|e| e.to_string())
            .and_then(|bytes| parse_certificates(&bytes).map_err(|e| e.to_string()));
        match loaded {
            Ok(certs) => {
                log::debug!("Loaded {} certificate(s) from {}", certs.len(), file.display());
                certificates.extend(certs);
            }
            Err(e) => log::warn!("Ignoring trusted certificate file {}: {e}", file.display()),
        }
    }
    Ok(certificates)
}

fn has_trusted_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| TRUSTED_EXTENSIONS.iter().any(|t| ext.eq_ignore_ascii_case(t)))
}

/// PEM chain if the data looks like PEM, a single DER certificate otherwise.
fn parse_certificates(bytes: &[u8]) -> der::Result<Vec<Certificate>> {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let text = &bytes[start..];
    if text.starts_with(b"-----BEGIN") {
        Certificate::load_pem_chain(text)
    } else {
        Certificate::from_der(bytes).map(|c| vec![c])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn generated(cn: &str) -> rcgen::Certificate {
        let mut params = rcgen::CertificateParams::new(Vec::<String>::new());
        params.distinguished_name = rcgen::DistinguishedName::new();
        params.distinguished_name.push(rcgen::DnType::CommonName, cn);
        rcgen::Certificate::from_params(params).unwrap()
    }

    #[test]
    fn loads_pem_and_der() {
        let dir = TempDir::new().unwrap();
        let cert = generated("Policy Root");
        let der_path = dir.path().join("root.der");
        let pem_path = dir.path().join("root.pem");
        fs::write(&der_path, cert.serialize_der().unwrap()).unwrap();
        fs::write(&pem_path, cert.serialize_pem().unwrap()).unwrap();

        let from_der = load_certificate(&der_path).unwrap();
        let from_pem = load_certificate(&pem_path).unwrap();
        assert_eq!(from_der.tbs_certificate.subject.to_string(), "CN=Policy Root");
        assert_eq!(
            from_der.tbs_certificate.subject,
            from_pem.tbs_certificate.subject
        );
    }

    #[test]
    fn missing_or_garbage_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            load_certificate(&dir.path().join("absent.crt")),
            Err(TrustError::IoError(_))
        ));
        let junk = dir.path().join("junk.crt");
        fs::write(&junk, b"junk").unwrap();
        assert!(matches!(
            load_certificate(&junk),
            Err(TrustError::CertificateError(_))
        ));
    }

    #[test]
    fn trusted_folder_skips_bad_and_foreign_files() {
        let dir = TempDir::new().unwrap();
        let b = generated("B CA");
        let a = generated("A CA");
        fs::write(dir.path().join("b.crt"), b.serialize_pem().unwrap()).unwrap();
        fs::write(dir.path().join("a.CER"), a.serialize_der().unwrap()).unwrap();
        fs::write(dir.path().join("broken.cer"), b"not a certificate").unwrap();
        fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();

        let certs = load_trusted_folder(dir.path()).unwrap();
        let subjects: Vec<String> = certs
            .iter()
            .map(|c| c.tbs_certificate.subject.to_string())
            .collect();
        assert_eq!(subjects, vec!["CN=A CA", "CN=B CA"]);
    }
}
