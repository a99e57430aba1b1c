use crate::scry_browser::{
    behavioral::BehavioralEngine, page::ScryPage, stealth::build_launch_arguments, PageLauncher,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use fantoccini::ClientBuilder;
use scry_config::WebDriverConfig;
use serde_json::json;
use tracing::info;
use webdriver::capabilities::Capabilities;

/// Launches one chromedriver session (one browser process, one tab) per call.
///
/// The chromedriver endpoint comes from [`WebDriverConfig::url`]
/// (default `http://localhost:9515`).
#[derive(Debug, Clone)]
pub struct ChromeLauncher {
    config: WebDriverConfig,
}

impl ChromeLauncher {
    pub fn new(config: WebDriverConfig) -> Self {
        Self { config }
    }

    fn capabilities(&self) -> Capabilities {
        let mut caps = Capabilities::new();
        caps.insert(
            "goog:chromeOptions".to_string(),
            json!({ "args": build_launch_arguments(&self.config) }),
        );
        caps.insert("pageLoadStrategy".to_string(), json!("normal"));
        caps
    }
}

#[async_trait]
impl PageLauncher for ChromeLauncher {
    type Page = ScryPage;

    async fn launch(&self) -> Result<ScryPage> {
        let client = ClientBuilder::native()
            .capabilities(self.capabilities())
            .connect(&self.config.url)
            .await
            .with_context(|| format!("could not start a session at {}", self.config.url))?;

        info!(
            target: "scry.driver",
            endpoint = %self.config.url,
            headless = self.config.headless,
            "browser session started"
        );

        Ok(ScryPage::new(
            client,
            self.config.stealth,
            BehavioralEngine::new(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capabilities_carry_chrome_args() {
        let launcher = ChromeLauncher::new(WebDriverConfig::default());
        let caps = launcher.capabilities();
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(args.iter().any(|a| a.as_str() == Some("--headless=new")));
        assert_eq!(caps["pageLoadStrategy"], json!("normal"));
    }
}
