//! End-to-end check of a lock file against a mock Packagist instance.

use std::io::Write;

use mockito::{Mock, Server, ServerGuard};
use packagist_checker::{AuditError, CheckOptions, Filter, PackagistChecker};
use tempfile::NamedTempFile;

const LOCK: &str = r#"{
    "packages": [
        {"name": "monolog/monolog", "version": "1.19.0", "type": "library"},
        {"name": "psr/log", "version": "1.0.0", "source": {"type": "git", "url": "https://github.com/php-fig/log.git"}},
        {"name": "doctrine/no-exist", "version": "1.0.0"},
        {"name": "symfony/symfony", "version": "v3.1.2"},
        {"name": "phenx/php-font-lib", "version": "0.4"},
        {"name": "twig/twig", "version": "v1.24.0"},
        {"name": "zendframework/zend-diactoros", "version": "1.3.5"},
        {"name": "symfony/polyfill-mbstring", "version": "v1.2.0"}
    ],
    "packages-dev": [
        {"name": "phpunit/phpunit", "version": "5.4.6"}
    ]
}"#;

fn lock_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(LOCK.as_bytes()).unwrap();
    file
}

async fn package(server: &mut ServerGuard, name: &str, versions: &[&str]) -> Mock {
    let versions: Vec<String> = versions
        .iter()
        .map(|v| format!(r#""{}": {{"version": "{}", "type": "library"}}"#, v, v))
        .collect();
    let body = format!(r#"{{"packages": {{"{}": {{{}}}}}}}"#, name, versions.join(","));

    server
        .mock("GET", format!("/p/{}.json", name).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

async fn packagist() -> (ServerGuard, Vec<Mock>) {
    let mut server = Server::new_async().await;
    let mut mocks = vec![
        server
            .mock("GET", "/packages/list.json")
            .with_status(200)
            .with_body(r#"{"packageNames": []}"#)
            .expect_at_least(1)
            .create_async()
            .await,
    ];

    mocks.push(package(&mut server, "monolog/monolog", &["1.19.0", "1.20.0"]).await);
    mocks.push(package(&mut server, "psr/log", &["1.0.0", "1.0.1"]).await);
    mocks.push(package(&mut server, "symfony/symfony", &["v3.1.2", "v3.1.3"]).await);
    mocks.push(package(&mut server, "phenx/php-font-lib", &["0.4", "0.4.1", "0.5"]).await);
    mocks.push(package(&mut server, "twig/twig", &["v1.24.0", "v1.24.1"]).await);
    mocks.push(package(&mut server, "zendframework/zend-diactoros", &["1.3.5", "1.3.6"]).await);
    mocks.push(package(&mut server, "symfony/polyfill-mbstring", &["v1.2.0"]).await);
    mocks.push(package(&mut server, "phpunit/phpunit", &["5.4.6", "5.4.7"]).await);

    (server, mocks)
}

fn checker(server: &ServerGuard) -> PackagistChecker {
    let mut checker = PackagistChecker::new();
    checker.set_packagist_url(&server.url());
    checker
}

#[tokio::test]
async fn check_returns_every_package_in_manifest_order() {
    let (server, _mocks) = packagist().await;
    let file = lock_file();

    let report = checker(&server)
        .check(file.path(), &CheckOptions::default())
        .await
        .unwrap();

    let names: Vec<&str> = report.packages.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "monolog/monolog",
            "psr/log",
            "doctrine/no-exist",
            "symfony/symfony",
            "phenx/php-font-lib",
            "twig/twig",
            "zendframework/zend-diactoros",
            "symfony/polyfill-mbstring",
        ]
    );
    assert!(report.has_bugs());

    let unknown = &report.packages[2];
    assert!(!unknown.registry_known);
    assert!(!unknown.has_bug);

    let font_lib = &report.packages[4];
    assert!(font_lib.registry_known);
    assert!(!font_lib.follows_semver());
    assert!(!font_lib.has_bug);
}

#[tokio::test]
async fn check_only_bugs_returns_flagged_packages() {
    let (server, _mocks) = packagist().await;
    let file = lock_file();
    let options = CheckOptions {
        filter: Filter::BugsOnly,
        ..CheckOptions::default()
    };

    let report = checker(&server).check(file.path(), &options).await.unwrap();

    let names: Vec<&str> = report.packages.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["psr/log", "symfony/symfony", "twig/twig", "zendframework/zend-diactoros"]
    );
    assert!(report.packages.iter().all(|p| p.registry_known && p.has_bug));
}

#[tokio::test]
async fn check_includes_dev_packages_on_request() {
    let (server, _mocks) = packagist().await;
    let file = lock_file();
    let options = CheckOptions {
        filter: Filter::BugsOnly,
        include_dev: true,
        ..CheckOptions::default()
    };

    let report = checker(&server).check(file.path(), &options).await.unwrap();

    assert_eq!(report.packages.len(), 5);
    assert!(report.packages.iter().any(|p| p.name == "phpunit/phpunit"));
}

#[tokio::test]
async fn check_skips_ignored_packages() {
    let (server, _mocks) = packagist().await;
    let file = lock_file();
    let mut options = CheckOptions::default();
    options.ignore.packages = vec!["symfony/*".to_string(), "psr/log".to_string()];

    let report = checker(&server).check(file.path(), &options).await.unwrap();

    assert_eq!(report.packages.len(), 5);
    assert_eq!(report.bug_count(), 2);
    assert!(!report.packages.iter().any(|p| p.name.starts_with("symfony/")));
}

#[tokio::test]
async fn check_without_bugs() {
    let mut server = Server::new_async().await;
    let _probe = server
        .mock("GET", "/packages/list.json")
        .with_status(200)
        .create_async()
        .await;
    let _log = package(&mut server, "psr/log", &["1.0.0"]).await;

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(br#"{"packages": [{"name": "psr/log", "version": "1.0.0"}]}"#)
        .unwrap();

    let options = CheckOptions {
        filter: Filter::BugsOnly,
        ..CheckOptions::default()
    };
    let report = checker(&server).check(file.path(), &options).await.unwrap();

    assert!(report.packages.is_empty());
    assert!(!report.has_bugs());
}

#[tokio::test]
async fn check_fails_on_unreachable_registry() {
    let file = lock_file();
    let mut checker = PackagistChecker::new();
    checker.set_packagist_url("http://127.0.0.1:1");

    let err = checker
        .check(file.path(), &CheckOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, AuditError::RegistryUnreachable { .. }));
    assert!(err.to_string().contains("http://127.0.0.1:1"));
}

#[tokio::test]
async fn check_fails_on_missing_lock_file() {
    let err = PackagistChecker::new()
        .check(std::path::Path::new("no-exist.lock"), &CheckOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, AuditError::ManifestNotFound(_)));
}
