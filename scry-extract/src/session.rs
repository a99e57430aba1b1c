//! Lifecycle of the single browser tab owned by one extraction run.
use crate::target::NavigationTarget;
use anyhow::anyhow;
use scry_common::{ExtractError, Result};
use scry_drivers::BrowserPage;
use std::time::Duration;
use tokio::{
    runtime::Handle,
    time::{sleep, Instant},
};
use tracing::{debug, warn};

const READY_POLL: Duration = Duration::from_millis(100);

/// Exclusive owner of one browser tab.
///
/// Released with [`PageSession::close`], which consumes the session so it
/// cannot be closed twice. A session dropped without `close` (the caller
/// cancelled the run, or a step panicked) is closed on a background task of
/// the current runtime.
pub struct PageSession<P: BrowserPage> {
    page: Option<P>,
}

impl<P: BrowserPage> PageSession<P> {
    pub fn new(page: P) -> Self {
        Self { page: Some(page) }
    }

    fn page(&self) -> anyhow::Result<&P> {
        self.page.as_ref().ok_or_else(|| anyhow!("page session already released"))
    }

    fn page_mut(&mut self) -> anyhow::Result<&mut P> {
        self.page.as_mut().ok_or_else(|| anyhow!("page session already released"))
    }

    /// Navigate to the target and wait for `document.readyState == "complete"`.
    ///
    /// Returns the final ready state.
    pub async fn open(&mut self, target: &NavigationTarget, timeout: Duration) -> Result<String> {
        let started = Instant::now();
        let url = target.url().as_str();
        let nav_err = |e: anyhow::Error| ExtractError::Navigation(format!("{e:#}"));

        let page = self.page_mut().map_err(nav_err)?;
        page.set_page_load_timeout(timeout).await.map_err(nav_err)?;
        page.goto(url).await.map_err(nav_err)?;

        loop {
            let state = page.ready_state().await.map_err(nav_err)?;
            if state == "complete" {
                debug!(target: "scry.session", %url, elapsed_ms = started.elapsed().as_millis() as u64, "page loaded");
                return Ok(state);
            }
            if started.elapsed() >= timeout {
                return Err(ExtractError::NavigationTimeout {
                    after_ms: started.elapsed().as_millis() as u64,
                });
            }
            sleep(READY_POLL).await;
        }
    }

    /// Fixed wait for client-side rendering after the load signal.
    pub async fn settle(&self, delay: Duration) {
        if !delay.is_zero() {
            debug!(target: "scry.session", delay_ms = delay.as_millis() as u64, "settling");
            sleep(delay).await;
        }
    }

    /// First DOM-order match for `selector`, waiting at most `wait`.
    pub async fn locate(&self, selector: &str, wait: Duration) -> anyhow::Result<Option<P::Element>> {
        self.page()?.find(selector, wait).await
    }

    pub async fn read_text(&self, element: &P::Element) -> anyhow::Result<String> {
        self.page()?.text(element).await
    }

    pub async fn evaluate(&self, script: &str) -> anyhow::Result<serde_json::Value> {
        self.page()?.execute(script).await
    }

    pub async fn fill(&self, element: &P::Element, text: &str) -> anyhow::Result<()> {
        self.page()?.type_text(element, text).await
    }

    pub async fn click(&self, element: &P::Element) -> anyhow::Result<()> {
        self.page()?.click(element).await
    }

    pub async fn press_enter(&self, element: &P::Element) -> anyhow::Result<()> {
        self.page()?.press_enter(element).await
    }

    /// Release the tab and its browser process.
    ///
    /// Close failures are logged; they never change the outcome of a run.
    pub async fn close(mut self) {
        if let Some(page) = self.page.take() {
            release(page).await;
        }
    }
}

async fn release<P: BrowserPage>(mut page: P) {
    match page.close().await {
        Ok(()) => debug!(target: "scry.session", "session closed"),
        Err(e) => warn!(target: "scry.session", error = %format!("{e:#}"), "session close failed"),
    }
}

impl<P: BrowserPage> Drop for PageSession<P> {
    fn drop(&mut self) {
        let Some(page) = self.page.take() else {
            return;
        };
        match Handle::try_current() {
            Ok(runtime) => {
                warn!(target: "scry.session", "page session dropped before close; releasing in background");
                runtime.spawn(release(page));
            }
            Err(_) => {
                warn!(target: "scry.session", "page session dropped outside a runtime; browser left open");
            }
        }
    }
}
