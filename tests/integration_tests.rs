use chrono::{TimeZone, Utc};
use clap::Parser;
use gemails::core::Classification;
use gemails::{
    CliConfig, ConsoleReporter, GitHubClient, HarvestEngine, LocalStorage, RunOptions, Settings,
    WhoisClient,
};
use httpmock::prelude::*;
use std::process::Command;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// WHOIS server answering every connection from a fixed table keyed by domain.
async fn start_whois(records: &'static [(&'static str, &'static str)]) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let mut buf = [0u8; 256];
            let n = socket.read(&mut buf).await.unwrap_or(0);
            let query = String::from_utf8_lossy(&buf[..n]).trim().to_string();
            let reply = records
                .iter()
                .find(|(domain, _)| *domain == query)
                .map(|(_, record)| *record)
                .unwrap_or("No match for domain\n");
            let _ = socket.write_all(reply.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });
    port
}

fn settings(server: &MockServer, output: &str, extra: &[&str]) -> Settings {
    let base_url = server.base_url();
    let mut args = vec![
        "gemails",
        "-u",
        "octo",
        "-t",
        "t0ken",
        "-o",
        output,
        "--api-base-url",
        base_url.as_str(),
        "--whois-server",
        "127.0.0.1",
    ];
    args.extend_from_slice(extra);
    Settings::resolve(&CliConfig::try_parse_from(args).unwrap(), None)
}

#[tokio::test]
async fn test_end_to_end_all_repositories() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("emails.txt");

    let server = MockServer::start();
    let repos_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/users/octo/repos")
            .header("Authorization", "Bearer t0ken");
        then.status(200).json_body(serde_json::json!([
            {"name": "alpha"},
            {"name": "empty"},
            {"name": "beta"}
        ]));
    });
    let alpha_mock = server.mock(|when, then| {
        when.method(GET).path("/repos/octo/alpha/commits");
        then.status(200).json_body(serde_json::json!([
            {"commit": {"committer": {"email": "a@x.com"}}},
            {"commit": {"committer": {"email": "a@x.com"}}},
            {"commit": {"committer": {"email": ""}}}
        ]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/repos/octo/empty/commits");
        then.status(409)
            .json_body(serde_json::json!({"message": "Git Repository is empty."}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/repos/octo/beta/commits");
        then.status(200).json_body(serde_json::json!([
            {"commit": {"committer": {"email": "b@y.org"}}},
            {"commit": {"committer": {"email": "c@unknown.net"}}}
        ]));
    });

    let whois_port = start_whois(&[
        ("x.com", "Domain Name: X.COM\r\nRegistry Expiry Date: 2099-01-01T04:00:00Z\r\n"),
        ("y.org", "Domain Name: Y.ORG\r\nExpiration Time : 2020-01-01 00:00:00\r\n"),
    ])
    .await;

    let settings = settings(&server, output.to_str().unwrap(), &[]);
    let host = GitHubClient::new(&settings.api_base_url, "t0ken", Duration::from_secs(5)).unwrap();
    let whois = WhoisClient::new("127.0.0.1", Duration::from_secs(2)).with_port(whois_port);
    let engine = HarvestEngine::new(host, whois, LocalStorage::default(), settings)
        .with_reporter(ConsoleReporter::without_colors());

    let mut out = Vec::new();
    let now = Utc.with_ymd_and_hms(2026, 10, 18, 0, 0, 0).unwrap();
    let summary = engine.run_with_output(&mut out, now).await.unwrap();

    repos_mock.assert();
    alpha_mock.assert();
    assert_eq!(summary.repositories, 3);
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "a@x.com\nb@y.org\nc@unknown.net\n"
    );

    let by_domain = |d: &str| {
        summary
            .expiry
            .iter()
            .find(|r| r.domain == d)
            .and_then(|r| r.classification())
    };
    assert_eq!(by_domain("x.com"), Some(Classification::Valid));
    assert_eq!(by_domain("y.org"), Some(Classification::ExpiringSoon));
    assert_eq!(by_domain("unknown.net"), None);

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Processing repository: empty"));
    assert!(text.contains("Domain x.com has a valid expiry date (Expires on 2099-01-01"));
    assert!(text.contains("Domain y.org is nearing expiry (Expires on 2020-01-01, -"));
}

#[tokio::test]
async fn test_single_repository_never_lists() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("emails.txt");

    let server = MockServer::start();
    let repos_mock = server.mock(|when, then| {
        when.method(GET).path("/users/octo/repos");
        then.status(200).json_body(serde_json::json!([]));
    });
    let commits_mock = server.mock(|when, then| {
        when.method(GET).path("/repos/octo/myrepo/commits");
        then.status(200).json_body(serde_json::json!([
            {"commit": {"committer": {"email": "dev@example.com"}}}
        ]));
    });

    let settings = settings(&server, output.to_str().unwrap(), &["-r", "myrepo"]);
    let host = GitHubClient::new(&settings.api_base_url, "t0ken", Duration::from_secs(5)).unwrap();
    let whois = WhoisClient::new("127.0.0.1", Duration::from_secs(1));
    let engine = HarvestEngine::new(host, whois, LocalStorage::default(), settings)
        .with_reporter(ConsoleReporter::without_colors())
        .with_options(RunOptions {
            show_emails: false,
            check_expiry: false,
        });

    let summary = engine.run_with_output(&mut Vec::new(), Utc::now()).await.unwrap();

    repos_mock.assert_hits(0);
    commits_mock.assert();
    assert_eq!(summary.emails.sorted(), vec!["dev@example.com"]);
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "dev@example.com\n");
}

#[tokio::test]
async fn test_bad_credentials_abort_the_run() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("emails.txt");

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/users/octo/repos");
        then.status(401)
            .json_body(serde_json::json!({"message": "Bad credentials"}));
    });

    let settings = settings(&server, output.to_str().unwrap(), &[]);
    let host = GitHubClient::new(&settings.api_base_url, "t0ken", Duration::from_secs(5)).unwrap();
    let whois = WhoisClient::new("127.0.0.1", Duration::from_secs(1));
    let engine = HarvestEngine::new(host, whois, LocalStorage::default(), settings);

    let err = engine
        .run_with_output(&mut Vec::new(), Utc::now())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        gemails::GemailsError::StatusError { status: 401, .. }
    ));
    assert!(!output.exists());
}

#[test]
fn test_binary_requires_user_and_token() {
    let output = Command::new(env!("CARGO_BIN_EXE_gemails"))
        .arg("-u")
        .arg("octo")
        .output()
        .expect("Failed to execute binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--token"), "stderr was: {}", stderr);
}

#[test]
fn test_binary_single_repository_run() {
    let temp_dir = TempDir::new().unwrap();
    let output_file = temp_dir.path().join("out.txt");

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/repos/octo/solo/commits");
        then.status(200).json_body(serde_json::json!([
            {"commit": {"committer": {"email": "z@z.dev"}}},
            {"commit": {"committer": {"email": "y@z.dev"}}}
        ]));
    });

    let output = Command::new(env!("CARGO_BIN_EXE_gemails"))
        .args(["-u", "octo", "-t", "t0ken", "-r", "solo", "--skip-expiry", "--no-color"])
        .args(["--show-emails", "--api-base-url", server.base_url().as_str()])
        .arg("-o")
        .arg(&output_file)
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Processing repository: solo"));
    assert!(stdout.contains("z@z.dev"));
    assert_eq!(
        std::fs::read_to_string(&output_file).unwrap(),
        "y@z.dev\nz@z.dev\n"
    );
}
