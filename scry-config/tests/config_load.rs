use scry_config::{NavigationMode, ScryConfigLoader, SelectorRole, StealthLevel};
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

const FILE_YAML: &str = r#"
version: "0.1"
webdriver:
  url: "${SCRY_TEST_WEBDRIVER}"
  headless: true
  stealth: maximum
target:
  mode: interactive
  site_domain: "example.ai"
selectors:
  - { locator: "textarea#ask", role: input }
  - { locator: "button.go", role: submit }
  - { locator: "div[data-testid='answer-v3']", role: answer }
  - { locator: "article", role: answer }
validator:
  min_length: 40
  boilerplate_prefixes: ["Sign in", "Upgrade"]
pipeline:
  settle_delay_ms: 1500
  fallback_line_cap: 10
"#;

#[test]
#[serial]
fn loads_file_and_expands_placeholders() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "scry.yaml", FILE_YAML);

    let config = temp_env::with_var("SCRY_TEST_WEBDRIVER", Some("http://grid:4444"), || {
        ScryConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load scry config")
    });

    assert_eq!(config.version.as_deref(), Some("0.1"));
    assert_eq!(config.webdriver.url, "http://grid:4444");
    assert_eq!(config.webdriver.stealth, StealthLevel::Maximum);
    assert_eq!(config.target.mode, NavigationMode::Interactive);
    assert_eq!(config.target.site_domain, "example.ai");
    // untouched keys keep their defaults
    assert_eq!(config.target.query_param, "q");
    assert_eq!(config.pipeline.candidate_timeout_ms, 2_000);

    let answers = config.candidates(SelectorRole::Answer);
    assert_eq!(answers.len(), 2);
    assert_eq!(answers[0].locator, "div[data-testid='answer-v3']");
    assert_eq!(answers[1].locator, "article");
    assert_eq!(config.validator.min_length, 40);
}

#[test]
#[serial]
fn environment_overrides_file_values() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "scry.yaml", FILE_YAML);

    let config = temp_env::with_vars(
        [
            ("SCRY_TEST_WEBDRIVER", Some("http://grid:4444")),
            ("SCRY_PIPELINE__SETTLE_DELAY_MS", Some("250")),
            ("SCRY_WEBDRIVER__HEADLESS", Some("false")),
        ],
        || ScryConfigLoader::new().with_file(&p).load().expect("load"),
    );

    assert_eq!(config.pipeline.settle_delay_ms, 250);
    assert!(!config.webdriver.headless);
    assert_eq!(config.pipeline.fallback_line_cap, 10);
}

#[test]
#[serial]
fn missing_optional_file_falls_back_to_defaults() {
    let tmp = TempDir::new().unwrap();
    let config = ScryConfigLoader::new()
        .without_env()
        .with_optional_file(tmp.path().join("absent.yaml"))
        .load()
        .expect("defaults load");

    assert_eq!(config.target.base_url, "https://www.perplexity.ai");
    assert_eq!(config.pipeline.max_concurrent_sessions, 2);
}

#[test]
#[serial]
fn missing_required_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let result = ScryConfigLoader::new()
        .without_env()
        .with_file(tmp.path().join("absent.yaml"))
        .load();
    assert!(result.is_err());
}
