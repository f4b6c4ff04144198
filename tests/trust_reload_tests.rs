//! Trust-list location, retrieval and snapshot reload against a mock server.

mod common;

use common::{ca, sia_ca_repository, trust_list, CertSpec, OID_SIA};
use der::Decode;
use rcgen::DnType;
use sigval_trust::adapters::trust_list_http_client::HttpTransportConfig;
use sigval_trust::infra::config::TrustConfiguration;
use sigval_trust::{
    HttpTrustListClient, TrustAnchorHolder, TrustAnchorReloader, TrustError, TrustListFetcher,
    TrustListUrl,
};
use std::sync::Arc;
use std::time::Duration;
use x509_cert::Certificate;

fn policy_root(trust_list_url: Option<&str>) -> Certificate {
    let subject = [(DnType::CommonName, "Sigval Policy Root")];
    let builder = CertSpec::subject(&subject);
    let builder = match trust_list_url {
        Some(url) => builder.with_extension(&OID_SIA, sia_ca_repository(url)),
        None => builder,
    };
    builder.certificate()
}

fn http_client() -> HttpTrustListClient {
    HttpTrustListClient::new(HttpTransportConfig {
        connect_timeout: Duration::from_secs(2),
        read_timeout: Duration::from_secs(2),
        proxy: None,
    })
    .unwrap()
}

#[test]
fn root_without_sia_yields_root_only_snapshot() {
    let root = policy_root(None);
    let fetcher = TrustListFetcher::new(http_client());
    assert_eq!(fetcher.resolve_location(&root).unwrap(), None);

    let reloader = TrustAnchorReloader::new(Some(root.clone()), http_client());
    let snapshot = reloader.reload().unwrap();
    assert_eq!(snapshot.len(), 1);
    assert!(snapshot.contains(&root));
    assert_eq!(snapshot.version(), 1);
}

#[test]
fn sia_location_is_resolved() {
    let root = policy_root(Some("https://tsltrust.example.se/tsl/certs.p7b"));
    let url = sigval_trust::services::resolve_location(&root).unwrap();
    assert_eq!(
        url.as_ref().map(TrustListUrl::as_str),
        Some("https://tsltrust.example.se/tsl/certs.p7b")
    );
}

#[test]
fn fetch_reports_http_404_as_fetch_failure() {
    let mut server = mockito::Server::new();
    let _mock = server.mock("GET", "/missing.p7b").with_status(404).create();

    let url = TrustListUrl::new(format!("{}/missing.p7b", server.url())).unwrap();
    let err = TrustListFetcher::new(http_client()).fetch(&url).unwrap_err();
    match err {
        TrustError::FetchFailure { uri, cause } => {
            assert_eq!(uri, url.as_str());
            assert!(cause.contains("404"), "unexpected cause: {cause}");
        }
        other => panic!("expected FetchFailure, got {other:?}"),
    }
}

#[test]
fn reload_publishes_fetched_certificates_and_keeps_them_on_failure() {
    let mut server = mockito::Server::new();
    let blob = trust_list(&[ca("Listed CA 1"), ca("Listed CA 2")]);
    let _ok = server
        .mock("GET", "/certs.p7b")
        .with_status(200)
        .with_header("content-type", "application/pkcs7-mime")
        .with_body(blob)
        .create();
    let _gone = server.mock("GET", "/gone.p7b").with_status(404).create();

    let holder = Arc::new(TrustAnchorHolder::new());
    let good_root = policy_root(Some(&format!("{}/certs.p7b", server.url())));
    let good = TrustAnchorReloader::new(Some(good_root.clone()), http_client())
        .with_holder(Arc::clone(&holder));

    let published = good.reload().unwrap();
    assert_eq!(published.version(), 1);
    assert_eq!(published.len(), 3);
    assert_eq!(published.certificates()[0], good_root);
    let listed = &published.certificates()[2];
    let issuers = published.certificates_with_issuer(&listed.tbs_certificate.issuer);
    assert_eq!(issuers.len(), 1);

    let failing_root = policy_root(Some(&format!("{}/gone.p7b", server.url())));
    let failing = TrustAnchorReloader::new(Some(failing_root), http_client())
        .with_holder(Arc::clone(&holder));
    let err = failing.reload().unwrap_err();
    assert!(matches!(err, TrustError::FetchFailure { .. }));

    let current = holder.current();
    assert_eq!(current.version(), 1);
    assert_eq!(current.len(), 3);
    assert!(Arc::ptr_eq(&current, &published));
}

#[test]
fn garbage_trust_list_fails_reload_without_publishing() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/certs.p7b")
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create();

    let root = policy_root(Some(&format!("{}/certs.p7b", server.url())));
    let reloader = TrustAnchorReloader::new(Some(root), http_client());
    assert!(matches!(reloader.reload(), Err(TrustError::FormatError(_))));
    assert_eq!(reloader.holder().current().version(), 0);
}

#[test]
fn reloader_from_config_includes_trusted_folder() {
    let dir = tempfile::TempDir::new().unwrap();
    let root_der = CertSpec::subject(&[(DnType::CommonName, "Config Root")]).der();
    let root_path = dir.path().join("policy-root.crt");
    std::fs::write(&root_path, &root_der).unwrap();

    let trusted = dir.path().join("trusted");
    std::fs::create_dir(&trusted).unwrap();
    std::fs::write(trusted.join("local.cer"), ca("Local CA")).unwrap();

    let config = TrustConfiguration {
        policy_root: Some(root_path),
        trusted_folder: Some(trusted),
        reload_interval_seconds: 60,
        ..TrustConfiguration::default()
    };
    let reloader = TrustAnchorReloader::from_config(&config).unwrap();
    assert_eq!(reloader.reload_interval(), Duration::from_secs(60));

    let snapshot = reloader.reload().unwrap();
    let subjects: Vec<String> = snapshot
        .summaries()
        .into_iter()
        .map(|s| s.subject)
        .collect();
    assert_eq!(subjects, vec!["CN=Config Root", "CN=Local CA"]);
    assert_eq!(
        snapshot.certificates()[0],
        Certificate::from_der(&root_der).unwrap()
    );
}
