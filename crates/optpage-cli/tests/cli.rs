use std::path::PathBuf;

use clap::Parser;
use optpage_cli::{run, Cli};

const SITE: &str = r#"
pages:
  - option_key: opts1
    page: general
    props:
      title: General
  - option_key: opts1
    page: layout
    props:
      page_format: post
  - option_key: opts2
    page: other
actions:
  cmb2_options_simple_page: <table class="form-table"></table>
"#;

fn site_file(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("site.yaml");
    std::fs::write(&path, SITE).unwrap();
    path
}

fn run_args(args: &[&str]) -> anyhow::Result<String> {
    let cli = Cli::try_parse_from(args)?;
    let mut out = Vec::new();
    run(cli, &mut out)?;
    Ok(String::from_utf8(out)?)
}

#[test]
fn test_render_page() {
    let dir = tempfile::tempdir().unwrap();
    let config = site_file(&dir);

    let html = run_args(&[
        "optpage",
        "--config",
        config.to_str().unwrap(),
        "render",
        "general",
    ])
    .unwrap();
    assert!(html.starts_with(r#"<div class="wrap cmb2-options-page options-opts1">"#));
    assert!(html.contains(r#"<h1 class="wp-heading-inline">General</h1>"#));
    assert!(html.contains(r#"<table class="form-table"></table>"#));
}

#[test]
fn test_render_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let config = site_file(&dir);

    let html = run_args(&[
        "optpage",
        "-c",
        config.to_str().unwrap(),
        "render",
        "general",
        "--format",
        "post",
        "--columns",
        "2",
        "--title",
        "Overridden",
    ])
    .unwrap();
    assert!(html.starts_with(r#"<div class="wrap options-opts1">"#));
    assert!(html.contains("columns-2"));
    assert!(html.contains("Overridden"));
}

#[test]
fn test_render_unknown_page() {
    let dir = tempfile::tempdir().unwrap();
    let config = site_file(&dir);

    let err = run_args(&[
        "optpage",
        "--config",
        config.to_str().unwrap(),
        "render",
        "missing",
    ])
    .unwrap_err();
    assert!(err.to_string().contains("missing"));
}

#[test]
fn test_list_pages() {
    let dir = tempfile::tempdir().unwrap();
    let config = site_file(&dir);

    let all = run_args(&["optpage", "--config", config.to_str().unwrap(), "list"]).unwrap();
    assert_eq!(all, "general\topts1\nlayout\topts1\nother\topts2\n");

    let group = run_args(&[
        "optpage",
        "--config",
        config.to_str().unwrap(),
        "list",
        "--option-key",
        "opts1",
    ])
    .unwrap();
    assert_eq!(group, "general\topts1\nlayout\topts1\n");

    let none = run_args(&[
        "optpage",
        "--config",
        config.to_str().unwrap(),
        "list",
        "--option-key",
        "nobody",
    ])
    .unwrap();
    assert_eq!(none, "");
}

#[test]
fn test_layered_configs() {
    let dir = tempfile::tempdir().unwrap();
    let base = site_file(&dir);
    let local = dir.path().join("local.json");
    std::fs::write(
        &local,
        r#"{"admin_url": "https://example.com/wp-admin/", "actions": {"cmb2_options_simple_page": "<p>local</p>"}}"#,
    )
    .unwrap();

    let html = run_args(&[
        "optpage",
        "--config",
        base.to_str().unwrap(),
        "--config",
        local.to_str().unwrap(),
        "render",
        "general",
    ])
    .unwrap();
    assert!(html.contains(r#"action="https://example.com/wp-admin/admin-post.php""#));
    assert!(html.contains("<p>local</p>"));
}

#[test]
fn test_requires_config() {
    let err = run_args(&["optpage", "list"]).unwrap_err();
    assert!(err.to_string().contains("--config"));
}
