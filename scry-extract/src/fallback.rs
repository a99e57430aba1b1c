//! Last-resort whole-document text harvester.
//!
//! Best-effort and lossy: it strips page chrome and keeps the first few
//! substantial lines. It makes no claim to find the real answer boundary.
use crate::{session::PageSession, validator::ContentValidator};
use regex::Regex;
use scry_common::{ExtractError, Result};
use scry_config::ScryConfig;
use scry_drivers::BrowserPage;
use std::sync::LazyLock;
use tracing::{debug, info};

/// Lone capitalised words such as button labels ("Share", "Rewrite").
static UI_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Za-z]{0,29}$").expect("valid label pattern"));

#[derive(Debug, Clone)]
pub struct FallbackExtractor {
    noise_selectors: Vec<String>,
    boilerplate: ContentValidator,
    site_domain: String,
    min_line_chars: usize,
    line_cap: usize,
}

impl FallbackExtractor {
    pub fn new(config: &ScryConfig) -> Self {
        Self {
            noise_selectors: config.pipeline.noise_selectors.clone(),
            boilerplate: ContentValidator::new(&config.validator),
            site_domain: config.target.site_domain.trim().to_lowercase(),
            min_line_chars: config.pipeline.fallback_min_line_chars,
            line_cap: config.pipeline.fallback_line_cap,
        }
    }

    /// In-page script that removes noise elements and returns the text of
    /// `<main>`, else `[role=main]`, else `<body>`.
    pub fn harvest_script(&self) -> String {
        let noise = serde_json::to_string(&self.noise_selectors).unwrap_or_else(|_| "[]".into());
        format!(
            r#"return (() => {{
    const noise = {noise};
    for (const sel of noise) {{
        try {{ document.querySelectorAll(sel).forEach((el) => el.remove()); }} catch (_) {{}}
    }}
    const root = document.querySelector('main')
        || document.querySelector('[role="main"]')
        || document.body;
    return root ? (root.innerText || '') : '';
}})();"#
        )
    }

    /// Run the harvest script in the page and reduce its text to an answer.
    pub async fn harvest<P: BrowserPage>(&self, session: &PageSession<P>) -> Result<String> {
        let raw = session
            .evaluate(&self.harvest_script())
            .await
            .map_err(|e| ExtractError::NoContentExtracted(format!("harvest script failed: {e:#}")))?;
        let raw = raw.as_str().unwrap_or_default();
        debug!(target: "scry.fallback", raw_chars = raw.chars().count(), "page text harvested");
        self.extract(raw)
    }

    /// Filter `raw_page_text` line by line and join the first survivors.
    ///
    /// Deterministic: identical input always yields identical output.
    pub fn extract(&self, raw_page_text: &str) -> Result<String> {
        let total = raw_page_text.lines().count();
        let kept: Vec<&str> = raw_page_text
            .lines()
            .map(str::trim)
            .filter(|line| self.keep_line(line))
            .take(self.line_cap)
            .collect();

        if kept.is_empty() {
            return Err(ExtractError::NoContentExtracted(format!(
                "no qualifying lines among {total}"
            )));
        }

        info!(target: "scry.fallback", kept = kept.len(), total, "fallback answer assembled");
        Ok(kept.join("\n\n"))
    }

    fn keep_line(&self, line: &str) -> bool {
        if line.chars().count() <= self.min_line_chars {
            return false;
        }
        if UI_LABEL.is_match(line) {
            return false;
        }
        if self.boilerplate.is_boilerplate(line) {
            return false;
        }
        if !self.site_domain.is_empty() && line.to_lowercase().contains(&self.site_domain) {
            return false;
        }
        true
    }
}
