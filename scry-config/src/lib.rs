//! Loader for Scry configuration with YAML + environment overlays.
//!
//! Sources are merged in the order they are attached; `SCRY_`-prefixed
//! environment variables are applied last and win. Nested keys use `__`, so
//! `SCRY_PIPELINE__SETTLE_DELAY_MS=500` overrides `pipeline.settle_delay_ms`.
//! After merging, `${VAR}` placeholders in string values are expanded.
use config::{Config, ConfigError, Environment, File};
use serde_json::Value;
use std::path::Path;

mod settings;

pub use settings::{
    default_boilerplate_prefixes, default_selectors, ExtractionStrategy, NavigationMode,
    PipelineConfig, ScryConfig, SelectorCandidate, SelectorRole, StealthLevel, TargetConfig,
    ValidatorConfig, WebDriverConfig,
};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => break,
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring (YAML + env overrides).
pub struct ScryConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env: Option<Environment>,
}

impl Default for ScryConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ScryConfigLoader {
    /// Start with no files and `SCRY_` environment overrides.
    ///
    /// ```
    /// use scry_config::ScryConfigLoader;
    ///
    /// let config = ScryConfigLoader::new()
    ///     .with_yaml_str("version: '1'")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.version.as_deref(), Some("1"));
    /// assert_eq!(config.validator.min_length, 50);
    /// ```
    pub fn new() -> Self {
        let env = Environment::with_prefix("SCRY")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true);
        Self {
            builder: Config::builder(),
            env: Some(env),
        }
    }

    /// Skip environment overrides entirely.
    pub fn without_env(mut self) -> Self {
        self.env = None;
        self
    }

    /// Attach a required YAML/TOML/JSON file; the format is inferred by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that may be absent.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    ///
    /// ```
    /// use scry_config::{NavigationMode, ScryConfigLoader, SelectorRole};
    ///
    /// let cfg = ScryConfigLoader::new()
    ///     .without_env()
    ///     .with_yaml_str(
    ///         r#"
    /// target:
    ///   mode: interactive
    /// selectors:
    ///   - { locator: "textarea", role: input }
    ///   - { locator: "div.answer", role: answer }
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.target.mode, NavigationMode::Interactive);
    /// assert_eq!(cfg.candidates(SelectorRole::Answer).len(), 1);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Merge all sources, expand `${VAR}` placeholders, deserialize and
    /// validate.
    ///
    /// ```
    /// use scry_config::ScryConfigLoader;
    ///
    /// unsafe { std::env::set_var("SCRY_DOC_DRIVER", "http://chromedriver:4444"); }
    ///
    /// let config = ScryConfigLoader::new()
    ///     .without_env()
    ///     .with_yaml_str("webdriver:\n  url: \"${SCRY_DOC_DRIVER}\"\n")
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.webdriver.url, "http://chromedriver:4444");
    ///
    /// unsafe { std::env::remove_var("SCRY_DOC_DRIVER"); }
    /// ```
    pub fn load(self) -> Result<ScryConfig, ConfigError> {
        let mut builder = self.builder;
        if let Some(env) = self.env {
            builder = builder.add_source(env);
        }
        let cfg = builder.build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: ScryConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;
        typed.validate().map_err(ConfigError::Message)?;

        Ok(typed)
    }
}
