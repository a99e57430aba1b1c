use crate::scry_browser::{behavioral::BehavioralEngine, stealth::evasion_scripts, BrowserPage};
use anyhow::{Context, Result};
use async_trait::async_trait;
use fantoccini::{elements::Element, error::CmdError, wd::TimeoutConfiguration, Client, Locator};
use scry_config::StealthLevel;
use std::time::Duration;
use tracing::debug;

/// WebDriver code point for the Enter key.
const ENTER_KEY: &str = "\u{e007}";

/// Page wrapper over a `fantoccini` client; one per browser session.
pub struct ScryPage {
    pub(crate) client: Client,
    pub(crate) stealth: StealthLevel,
    pub(crate) behavioral_engine: BehavioralEngine,
}

impl ScryPage {
    pub fn new(client: Client, stealth: StealthLevel, behavioral_engine: BehavioralEngine) -> Self {
        Self {
            client,
            stealth,
            behavioral_engine,
        }
    }

    async fn apply_stealth(&self) -> Result<()> {
        for script in evasion_scripts(self.stealth) {
            self.client
                .execute(script, vec![])
                .await
                .context("stealth script failed")?;
        }
        Ok(())
    }
}

fn is_not_found(err: &CmdError) -> bool {
    matches!(err, CmdError::WaitTimeout) || err.is_no_such_element()
}

#[async_trait]
impl BrowserPage for ScryPage {
    type Element = Element;

    async fn set_page_load_timeout(&mut self, timeout: Duration) -> Result<()> {
        let timeouts = TimeoutConfiguration::new(Some(timeout), Some(timeout), None);
        self.client
            .update_timeouts(timeouts)
            .await
            .context("failed to set WebDriver timeouts")
    }

    async fn goto(&mut self, url: &str) -> Result<()> {
        self.behavioral_engine.random_delay(100, 400).await;
        self.client
            .goto(url)
            .await
            .with_context(|| format!("failed to open {url}"))?;
        self.apply_stealth().await
    }

    async fn ready_state(&self) -> Result<String> {
        let state = self
            .client
            .execute("return document.readyState;", vec![])
            .await?;
        Ok(state.as_str().unwrap_or_default().to_string())
    }

    async fn find(&self, selector: &str, wait: Duration) -> Result<Option<Element>> {
        match self
            .client
            .wait()
            .at_most(wait)
            .for_element(Locator::Css(selector))
            .await
        {
            Ok(element) => Ok(Some(element)),
            Err(err) if is_not_found(&err) => {
                debug!(target: "scry.driver", %selector, "no element within wait");
                Ok(None)
            }
            Err(err) => Err(err).with_context(|| format!("lookup failed for {selector}")),
        }
    }

    async fn text(&self, element: &Element) -> Result<String> {
        element.text().await.map_err(anyhow::Error::from)
    }

    async fn type_text(&self, element: &Element, text: &str) -> Result<()> {
        self.behavioral_engine
            .type_text_human_like(element, text)
            .await
    }

    async fn click(&self, element: &Element) -> Result<()> {
        self.behavioral_engine.random_delay(80, 250).await;
        element.click().await?;
        Ok(())
    }

    async fn press_enter(&self, element: &Element) -> Result<()> {
        element.send_keys(ENTER_KEY).await?;
        Ok(())
    }

    async fn execute(&self, script: &str) -> Result<serde_json::Value> {
        self.client
            .execute(script, vec![])
            .await
            .context("in-page script failed")
    }

    async fn close(&mut self) -> Result<()> {
        self.client.clone().close().await?;
        Ok(())
    }
}
