#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Site {
    temp: TempDir,
}

impl Site {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("global")).unwrap();
        Self { temp }
    }

    fn root(&self) -> &Path {
        self.temp.path()
    }

    /// `seocontent` pointed at this site's project table, never the user's global one.
    fn cmd(&self) -> Command {
        let mut cmd = Command::new(cargo_bin("seocontent"));
        cmd.env("SEOCONTENT_GLOBAL_DATA", self.root().join("global"))
            .env_remove("SEOCONTENT_LOG")
            .current_dir(self.root())
            .arg("--data")
            .arg(self.root());
        cmd
    }

    fn record(&self, name: &str, json: &str) -> PathBuf {
        let path = self.root().join(name);
        fs::write(&path, json).unwrap();
        path
    }
}

#[test]
fn test_global_default_preview_workflow() {
    let site = Site::new();

    // 1. A type-wide default
    site.cmd()
        .args([
            "set",
            "Page",
            "--global-default",
            "--title",
            "%%model_title%% %%sep%% %%appParam_site%%",
            "--description",
            "All about %%model_title%%",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("SEO entry created"));

    assert!(site.root().join(".seocontent").join("seo_content.json").exists());

    // 2. A record without its own entry publishes the default
    let record = site.record("about.json", r#"{"id": 7, "title": "About"}"#);
    site.cmd()
        .args(["preview", "Page"])
        .arg(&record)
        .args(["--param", "site=Acme", "--separator", "|"])
        .assert()
        .success()
        .stdout(predicate::str::contains("About | Acme"))
        .stdout(predicate::str::contains(
            r#"<meta name="description" content="All about About">"#,
        ));

    // 3. show falls back to the default
    site.cmd()
        .args(["show", "Page", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("the Page default applies"))
        .stdout(predicate::str::contains("%%model_title%%"));

    // 4. list shows the stored entry
    site.cmd()
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Page (global)"));
}

#[test]
fn test_set_edit_and_delete_entry() {
    let site = Site::new();

    site.cmd()
        .args(["set", "Post", "3", "--title", "Hello"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SEO entry created"))
        .stdout(predicate::str::contains("Post/3"));

    site.cmd()
        .args(["set", "Post", "3", "--keywords", "greeting"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SEO entry updated"))
        .stdout(predicate::str::contains("[keywords]"));

    site.cmd()
        .args(["show", "Post", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello"))
        .stdout(predicate::str::contains("greeting"));

    site.cmd()
        .args(["delete", "Post", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SEO entry deleted"));

    site.cmd()
        .args(["delete", "Post", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No SEO entry for Post/3."));
}

#[test]
fn test_set_without_values_fails() {
    let site = Site::new();

    site.cmd()
        .args(["set", "Post", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to set"));
}

#[test]
fn test_check_title_reports_duplicates() {
    let site = Site::new();

    for id in ["1", "2"] {
        site.cmd()
            .args(["set", "Page", id, "--title", "Welcome"])
            .assert()
            .success();
    }

    let record = site.record("page2.json", r#"{"id": 2, "title": "Landing"}"#);
    site.cmd()
        .args(["check-title", "Page"])
        .arg(&record)
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            r#"Seo Title "Welcome" has already been taken."#,
        ));

    let record = site.record("page3.json", r#"{"id": 3, "title": "Pricing"}"#);
    site.cmd()
        .args(["set", "Page", "3", "--title", "Pricing plans"])
        .assert()
        .success();
    site.cmd()
        .args(["check-title", "Page"])
        .arg(&record)
        .assert()
        .success()
        .stdout(predicate::str::contains("is available for Page"));
}

#[test]
fn test_expand_without_record() {
    let site = Site::new();

    site.cmd()
        .args(["expand", "Docs %%sep%% %%appParam_site%% %%unknown%%", "-p", "site=Acme"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Docs - Acme %%unknown%%"))
        .stdout(predicate::str::contains("Unresolved placeholder %%unknown%%"));
}

#[test]
fn test_bad_record_file_fails() {
    let site = Site::new();
    let record = site.record("broken.json", "{ nope");

    site.cmd()
        .args(["preview", "Page"])
        .arg(&record)
        .assert()
        .failure()
        .stderr(predicate::str::contains("parsing record"));
}

#[test]
fn test_project_config_is_applied() {
    let site = Site::new();
    let data = site.root().join(".seocontent");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("seocontent.toml"), "separator = \"::\"\n").unwrap();

    site.cmd()
        .args(["expand", "a %%sep%% b"])
        .assert()
        .success()
        .stdout(predicate::str::contains("a :: b"));

    site.cmd()
        .args(["config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("separator"))
        .stdout(predicate::str::contains("::"));
}

#[test]
fn test_migrate_and_schema() {
    let site = Site::new();

    site.cmd()
        .args(["schema"])
        .assert()
        .success()
        .stdout(predicate::str::contains("migration.m160219_172342_create_seo_content"))
        .stdout(predicate::str::contains("pending"));

    site.cmd()
        .args(["migrate"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Applied m190618_014614_drop_seo_content_index",
        ));

    site.cmd()
        .args(["migrate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Table is up to date."));
}
