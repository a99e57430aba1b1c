use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

pub mod behavioral;
pub mod driver;
pub mod page;
pub mod stealth;

/// One browser tab, as seen by the extraction pipeline.
///
/// Implementations own exactly one browser process/tab. Lookups return the
/// first DOM-order match only. Pages are `'static` so a dropped session can
/// still be closed from a background task.
#[async_trait]
pub trait BrowserPage: Send + Sync + 'static {
    type Element: Send + Sync;

    /// Upper bound for a single navigation.
    async fn set_page_load_timeout(&mut self, timeout: Duration) -> Result<()>;

    /// Navigate and block until the browser reports the load event.
    async fn goto(&mut self, url: &str) -> Result<()>;

    /// Current `document.readyState`.
    async fn ready_state(&self) -> Result<String>;

    /// Wait up to `wait` for `selector`; `Ok(None)` when nothing matched.
    async fn find(&self, selector: &str, wait: Duration) -> Result<Option<Self::Element>>;

    /// Rendered (`innerText`-like) text of an element.
    async fn text(&self, element: &Self::Element) -> Result<String>;

    async fn type_text(&self, element: &Self::Element, text: &str) -> Result<()>;

    async fn click(&self, element: &Self::Element) -> Result<()>;

    async fn press_enter(&self, element: &Self::Element) -> Result<()>;

    /// Run a script in the page and return its JSON result.
    async fn execute(&self, script: &str) -> Result<serde_json::Value>;

    /// End the browser session. Called once per page.
    async fn close(&mut self) -> Result<()>;
}

/// Starts a fresh browser session per call.
#[async_trait]
pub trait PageLauncher: Send + Sync {
    type Page: BrowserPage;

    async fn launch(&self) -> Result<Self::Page>;
}
