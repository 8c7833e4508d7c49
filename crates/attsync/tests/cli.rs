mod common;

use common::*;

#[test]
fn missing_parameters_print_error_and_usage() {
    let dir = TempDir::new().unwrap();
    attsync(&dir)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("insufficient parameters"))
        .stdout(predicate::str::contains("action, filename, pageid, username"))
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn invalid_action_is_rejected_by_parser() {
    let dir = TempDir::new().unwrap();
    attsync(&dir)
        .args(["--action", "sync", "--filename", "a.txt", "--pageid", "1"])
        .assert()
        .code(2);
}

#[test]
fn debug_pull_prints_versioned_request() {
    let dir = TempDir::new().unwrap();
    attsync(&dir)
        .args([
            "--action",
            "pull",
            "--filename",
            "report.pdf.v3",
            "--pageid",
            "1001",
            "--username",
            "alice",
            "--urlbase",
            "https://wiki.example.com",
            "--debug",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Remote filename: report.pdf"))
        .stdout(predicate::str::contains("Version:         3"))
        .stdout(predicate::str::contains(
            "GET https://wiki.example.com/download/attachments/1001/report.pdf?version=3&api=v2",
        ));
}

#[test]
fn debug_push_mined_from_url() {
    let dir = TempDir::new().unwrap();
    attsync(&dir)
        .args([
            "--urlbase",
            "https://example.com/wiki/rest/api/content/1001/child/attachment",
            "--filename",
            "notes.txt",
            "--username",
            "alice",
            "--debug",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Action:          push"))
        .stdout(predicate::str::contains("Page ID:         1001"))
        .stdout(predicate::str::contains("Base URL:        https://example.com/wiki"))
        .stdout(predicate::str::contains(
            "GET https://example.com/wiki/rest/api/content/1001/child/attachment?filename=notes.txt&limit=200",
        ))
        .stdout(predicate::str::contains(
            "POST https://example.com/wiki/rest/api/content/1001/child/attachment/ATTACHMENT_ID/data",
        ))
        .stdout(predicate::str::contains("-F minorEdit=false"));
}

#[test]
fn username_and_base_url_from_config_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("attsync.toml"),
        "[confluence]\nbase_url = \"https://docs.example.org/\"\nusername = \"bob\"\n",
    )
    .unwrap();

    attsync(&dir)
        .args(["--action", "pull", "--filename", "a.txt", "--pageid", "7", "--debug"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Username:        bob"))
        .stdout(predicate::str::contains(
            "GET https://docs.example.org/download/attachments/7/a.txt?api=v2",
        ));
}

#[test]
fn push_missing_local_file_fails_before_network() {
    let dir = TempDir::new().unwrap();
    attsync(&dir)
        .args([
            "--action",
            "push",
            "--filename",
            "missing.txt",
            "--pageid",
            "1001",
            "--username",
            "alice",
            "--password",
            "secret",
            "--urlbase",
            "http://127.0.0.1:9",
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("local file not found"));
}

#[test]
fn pull_writes_attachment() {
    let dir = TempDir::new().unwrap();
    let (base_url, server) = stub_server(vec![(200, "%PDF-1.7 genuine report")]);

    attsync(&dir)
        .args([
            "--action",
            "pull",
            "--filename",
            "report.pdf.v3",
            "--pageid",
            "1001",
            "--username",
            "alice",
            "--password",
            "secret",
            "--urlbase",
            &base_url,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pulled report.pdf.v3 from"));

    assert_eq!(
        server.join().unwrap(),
        vec!["GET /download/attachments/1001/report.pdf?version=3&api=v2 HTTP/1.1"]
    );
    assert_eq!(
        std::fs::read_to_string(dir.path().join("report.pdf.v3")).unwrap(),
        "%PDF-1.7 genuine report"
    );
}

#[test]
fn pull_of_missing_page_fails_without_file() {
    let dir = TempDir::new().unwrap();
    let (base_url, server) = stub_server(vec![(200, "<html>Page does not exist</html>")]);

    attsync(&dir)
        .args([
            "--action",
            "pull",
            "--filename",
            "report.pdf.v3",
            "--pageid",
            "1001",
            "--username",
            "alice",
            "--password",
            "secret",
            "--urlbase",
            &base_url,
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("no valid attachment link"));

    server.join().unwrap();
    assert!(!dir.path().join("report.pdf.v3").exists());
}

#[test]
fn pull_auth_failure_is_fatal() {
    let dir = TempDir::new().unwrap();
    let (base_url, server) = stub_server(vec![(200, "Basic Authentication Failure")]);

    attsync(&dir)
        .args([
            "--action",
            "pull",
            "--filename",
            "notes.txt",
            "--pageid",
            "1001",
            "--username",
            "alice",
            "--password",
            "wrong",
            "--urlbase",
            &base_url,
        ])
        .assert()
        .code(3)
        .stdout(predicate::str::contains("Fatal: basic authentication failure"))
        .stdout(predicate::str::contains("Usage:").not());

    server.join().unwrap();
    assert!(!dir.path().join("notes.txt").exists());
}

#[test]
fn push_auth_failure_is_a_generic_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
    let (base_url, server) = stub_server(vec![
        (200, r#"{"results":[]}"#),
        (200, "<html><h1>Basic Authentication Failure</h1></html>"),
    ]);

    attsync(&dir)
        .args([
            "--action",
            "push",
            "--filename",
            "notes.txt",
            "--pageid",
            "1001",
            "--username",
            "alice",
            "--password",
            "wrong",
            "--urlbase",
            &base_url,
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "Error: basic authentication failure for user 'alice'",
        ))
        .stdout(predicate::str::contains("Fatal:").not())
        .stdout(predicate::str::contains("Usage:"));

    assert_eq!(server.join().unwrap().len(), 2);
}

#[test]
fn push_creates_attachment() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
    let (base_url, server) = stub_server(vec![
        (200, r#"{"results":[]}"#),
        (
            200,
            r#"{"results":[{"_links":{"webui":"/display/DOC/Page?preview=/1001/77/notes.txt"}}]}"#,
        ),
    ]);

    attsync(&dir)
        .env("ATTSYNC_PASSWORD", "secret")
        .args([
            "--action",
            "push",
            "--filename",
            "notes.txt",
            "--pageid",
            "1001",
            "--username",
            "alice",
            "--urlbase",
            &base_url,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pushed notes.txt to"));

    let seen = server.join().unwrap();
    assert_eq!(
        seen,
        vec![
            "GET /rest/api/content/1001/child/attachment?filename=notes.txt&limit=200 HTTP/1.1",
            "POST /rest/api/content/1001/child/attachment HTTP/1.1",
        ]
    );
}
