//! Integration tests for CLI behavior
//!
//! These tests drive the `selkit` binary against extension trees built in
//! temporary directories.

use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::*;

/// Helper to create a command for the selkit CLI
fn selkit_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_selkit"))
}

const SEARCH: &str = r##"{
    "identifier": "com.example.search",
    "name": "Search",
    "actions": [
        { "identifier": "web", "title": "Web search", "url": "https://search.example/?q=***" },
        { "identifier": "tag", "title": "Tag", "regex": "#(\\w+)", "url": "https://tags.example/***" }
    ]
}"##;

const LINKS: &str = r#"{
    // Only offered for URLs
    "identifier": "com.example.links",
    "name": "Links",
    "requirements": ["url"],
    "action": { "identifier": "open", "title": "Open link" },
}"#;

fn extensions() -> TempDir {
    let dir = TempDir::new().unwrap();
    dir.child("extensions/search/Config.json")
        .write_str(SEARCH)
        .unwrap();
    dir.child("extensions/links/Config.json")
        .write_str(LINKS)
        .unwrap();
    dir
}

fn with_extensions(dir: &TempDir) -> Command {
    let mut cmd = selkit_cmd();
    cmd.current_dir(dir.path())
        .arg("--extensions-dir")
        .arg(dir.child("extensions").path());
    cmd
}

mod help_command {
    use super::*;

    #[test]
    fn shows_help_with_flag() {
        selkit_cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage:"));
    }

    #[test]
    fn shows_version_with_flag() {
        selkit_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }
}

mod list_command {
    use super::*;

    #[test]
    fn lists_extensions_and_actions() {
        let dir = extensions();

        with_extensions(&dir)
            .arg("list")
            .assert()
            .success()
            .stdout(predicate::str::contains("Search (com.example.search)"))
            .stdout(predicate::str::contains("web: Web search"))
            .stdout(predicate::str::contains("open: Open link [disabled]"))
            .stdout(predicate::str::contains("Loaded 2 extensions"));
    }

    #[test]
    fn lists_as_json() {
        let dir = extensions();

        let output = with_extensions(&dir)
            .args(["list", "--format", "json"])
            .output()
            .unwrap();

        assert!(output.status.success());
        let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn reads_extensions_dir_from_config() {
        let dir = extensions();
        dir.child("selkit.jsonc")
            .write_str(r#"{ "extensions_dir": "extensions", "disabled": ["com.example.links"] }"#)
            .unwrap();

        selkit_cmd()
            .current_dir(dir.path())
            .arg("list")
            .assert()
            .success()
            .stdout(predicate::str::contains("Loaded 1 extensions"));
    }

    #[test]
    fn invalid_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        dir.child("broken.json").write_str("{ \"disabled\": 3 }").unwrap();

        selkit_cmd()
            .current_dir(dir.path())
            .args(["--config", "broken.json", "list"])
            .assert()
            .code(2);
    }
}

mod actions_command {
    use super::*;

    #[test]
    fn plain_text_gets_search_only() {
        let dir = extensions();

        with_extensions(&dir)
            .args(["actions", "hello world"])
            .assert()
            .success()
            .stdout(predicate::str::contains("com.example.search/web"))
            .stdout(predicate::str::contains("com.example.links/open").not());
    }

    #[test]
    fn urls_unlock_link_actions() {
        let dir = extensions();

        with_extensions(&dir)
            .args(["actions", "see https://docs.example/guide"])
            .assert()
            .success()
            .stdout(predicate::str::contains("com.example.links/open"));
    }

    #[test]
    fn pattern_match_is_reported() {
        let dir = extensions();

        let output = with_extensions(&dir)
            .args(["actions", "about #rust", "--format", "json"])
            .output()
            .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        let tag = value
            .as_array()
            .unwrap()
            .iter()
            .find(|a| a["identifier"] == "tag")
            .unwrap();
        assert_eq!(tag["matched"], "#rust");
        assert_eq!(tag["captures"], serde_json::json!(["rust"]));
    }

    #[test]
    fn no_copy_hides_copy_actions() {
        let dir = TempDir::new().unwrap();
        dir.child("extensions/clip/Config.json")
            .write_str(
                r#"{
                    "identifier": "com.example.clip",
                    "requirements": ["copy"],
                    "action": { "identifier": "keep", "title": "Keep" }
                }"#,
            )
            .unwrap();

        with_extensions(&dir)
            .args(["actions", "hello"])
            .assert()
            .success()
            .stdout(predicate::str::contains("com.example.clip/keep"));

        with_extensions(&dir)
            .args(["actions", "hello", "--no-copy"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("Found 0 actions"));
    }

    #[test]
    fn app_name_requires_app() {
        let dir = extensions();

        with_extensions(&dir)
            .args(["actions", "hello", "--app-name", "Editor"])
            .assert()
            .code(2);
    }

    #[test]
    fn empty_text_offers_nothing() {
        let dir = extensions();

        with_extensions(&dir)
            .args(["actions", ""])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("Found 0 actions"));
    }
}

mod run_command {
    use super::*;

    #[test]
    fn runs_url_template() {
        let dir = extensions();

        with_extensions(&dir)
            .args(["run", "com.example.search", "tag", "about #rust"])
            .assert()
            .success()
            .stdout(predicate::str::contains("open: https://tags.example/%23rust"));
    }

    #[test]
    fn outcome_as_json() {
        let dir = extensions();

        with_extensions(&dir)
            .args(["run", "com.example.search", "web", "a b", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"open-url\""))
            .stdout(predicate::str::contains("https://search.example/?q=a+b"));
    }

    #[test]
    fn unknown_action_exits_with_one() {
        let dir = extensions();

        with_extensions(&dir)
            .args(["run", "com.example.search", "missing", "x"])
            .assert()
            .code(1);
    }

    #[test]
    fn disabled_action_is_an_error() {
        let dir = extensions();

        with_extensions(&dir)
            .args(["run", "com.example.links", "open", "https://a.example"])
            .assert()
            .code(2);
    }
}

mod resolve_command {
    use super::*;

    #[test]
    fn resolves_with_extension_search() {
        let dir = TempDir::new().unwrap();
        dir.child("pkg/helper.ts").write_str("").unwrap();

        selkit_cmd()
            .current_dir(dir.path())
            .args(["resolve", "./helper", "--package", "pkg"])
            .assert()
            .success()
            .stdout(predicate::str::ends_with("helper.ts\n"));
    }

    #[test]
    fn resolves_relative_to_issuer() {
        let dir = TempDir::new().unwrap();
        dir.child("pkg/lib/util.js").write_str("").unwrap();
        dir.child("pkg/lib/main.js").write_str("").unwrap();

        selkit_cmd()
            .current_dir(dir.path())
            .args(["resolve", "./util", "--package", "pkg", "--from", "pkg/lib/main.js"])
            .assert()
            .success()
            .stdout(predicate::str::contains("lib/util.js"));
    }

    #[test]
    fn falls_back_to_repository() {
        let dir = TempDir::new().unwrap();
        dir.child("pkg/Config.json").write_str("{}").unwrap();
        dir.child("shared/common.js").write_str("").unwrap();

        selkit_cmd()
            .current_dir(dir.path())
            .args(["resolve", "common", "--package", "pkg", "--repository", "shared"])
            .assert()
            .success()
            .stdout(predicate::str::contains("shared"));
    }

    #[test]
    fn unresolvable_reference_exits_with_one() {
        let dir = TempDir::new().unwrap();
        dir.child("pkg/Config.json").write_str("{}").unwrap();

        selkit_cmd()
            .current_dir(dir.path())
            .args(["resolve", "./nope", "--package", "pkg"])
            .assert()
            .code(1);
    }
}
