//! Strongly typed configuration for one extraction target.
//!
//! Every section is defaulted, so an empty document yields a working
//! configuration for the default target. Selector lists, thresholds and
//! timings are data: reordering or appending candidates needs no code change.
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScryConfig {
    pub version: Option<String>,
    pub webdriver: WebDriverConfig,
    pub target: TargetConfig,
    /// Ordered candidates, most specific first. Order within a role is the
    /// resolution priority.
    pub selectors: Vec<SelectorCandidate>,
    pub validator: ValidatorConfig,
    pub pipeline: PipelineConfig,
}

impl Default for ScryConfig {
    fn default() -> Self {
        Self {
            version: None,
            webdriver: WebDriverConfig::default(),
            target: TargetConfig::default(),
            selectors: default_selectors(),
            validator: ValidatorConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl ScryConfig {
    /// Candidates for `role`, preserving configured priority.
    pub fn candidates(&self, role: SelectorRole) -> Vec<SelectorCandidate> {
        self.selectors
            .iter()
            .filter(|c| c.role == role)
            .cloned()
            .collect()
    }

    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        if !self.selectors.iter().any(|c| c.role == SelectorRole::Answer) {
            return Err("selectors: at least one `answer` candidate is required".into());
        }
        if self.target.mode == NavigationMode::Interactive
            && !self.selectors.iter().any(|c| c.role == SelectorRole::Input)
        {
            return Err("selectors: interactive mode needs an `input` candidate".into());
        }
        if self.pipeline.max_concurrent_sessions == 0 {
            return Err("pipeline.max_concurrent_sessions must be at least 1".into());
        }
        if self.pipeline.fallback_line_cap == 0 {
            return Err("pipeline.fallback_line_cap must be at least 1".into());
        }
        if self.pipeline.extraction == ExtractionStrategy::FallbackOnly
            && self.target.mode != NavigationMode::Direct
        {
            return Err("pipeline.extraction: `fallback_only` requires `direct` mode".into());
        }
        if self.target.base_url.trim().is_empty() {
            return Err("target.base_url must not be empty".into());
        }
        Ok(())
    }
}

/// Browser launch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebDriverConfig {
    /// Endpoint of a running chromedriver.
    pub url: String,
    pub headless: bool,
    pub stealth: StealthLevel,
    /// Sent as the `User-Agent` header of every request the tab makes.
    pub user_agent: String,
    /// Sent as the `Accept-Language` header.
    pub accept_language: Vec<String>,
    pub window: (u32, u32),
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9515".into(),
            headless: true,
            stealth: StealthLevel::Balanced,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36".into(),
            accept_language: vec!["en-US".into(), "en".into()],
            window: (1920, 1080),
        }
    }
}

/// Browser automation stealth level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StealthLevel {
    Lightweight,
    #[default]
    Balanced,
    Maximum,
}

/// How the pipeline reaches a result-bearing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationMode {
    /// Load a query-string URL that renders the answer directly.
    #[default]
    Direct,
    /// Load the landing page, type the prompt and submit it.
    Interactive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub base_url: String,
    pub search_path: String,
    pub query_param: String,
    /// Lines mentioning this string are treated as site chrome.
    pub site_domain: String,
    pub mode: NavigationMode,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.perplexity.ai".into(),
            search_path: "/search".into(),
            query_param: "q".into(),
            site_domain: "perplexity.ai".into(),
            mode: NavigationMode::Direct,
        }
    }
}

/// Semantic target of a selector candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectorRole {
    Input,
    Submit,
    Answer,
}

/// One strategy for locating a DOM element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorCandidate {
    /// CSS locator expression.
    pub locator: String,
    pub role: SelectorRole,
}

impl SelectorCandidate {
    pub fn new(locator: impl Into<String>, role: SelectorRole) -> Self {
        Self {
            locator: locator.into(),
            role,
        }
    }
}

/// Default selector table: newest known layout, then class heuristics, then
/// generic tags.
pub fn default_selectors() -> Vec<SelectorCandidate> {
    use SelectorRole::*;
    [
        ("textarea[data-testid='search-box']", Input),
        ("textarea[placeholder*='Ask']", Input),
        ("div[contenteditable='true']", Input),
        ("textarea", Input),
        ("button[aria-label='Submit']", Submit),
        ("button[type='submit']", Submit),
        ("div[data-testid='answer-content']", Answer),
        ("div[data-testid='answer']", Answer),
        ("div.prose", Answer),
        ("[class*='markdown']", Answer),
        ("[class*='answer']", Answer),
        ("main article", Answer),
        ("article", Answer),
    ]
    .into_iter()
    .map(|(locator, role)| SelectorCandidate::new(locator, role))
    .collect()
}

/// Thresholds of the content-quality heuristic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Minimum trimmed length, in characters, of accepted text.
    pub min_length: usize,
    /// Case-insensitive prefixes of sign-in, upgrade and trial prompts.
    pub boilerplate_prefixes: Vec<String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            min_length: 50,
            boilerplate_prefixes: default_boilerplate_prefixes(),
        }
    }
}

pub fn default_boilerplate_prefixes() -> Vec<String> {
    [
        "Sign in",
        "Sign up",
        "Log in",
        "Login",
        "Upgrade",
        "Try Pro",
        "Start free trial",
        "Get Pro",
        "Subscribe",
        "Accept cookies",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Which extractor runs first once the page has settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// Answer selector chain, whole-document harvest only when it is exhausted.
    #[default]
    SelectorsFirst,
    /// Skip the selector chain and harvest the document directly.
    /// Direct navigation only.
    FallbackOnly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub extraction: ExtractionStrategy,
    /// Fixed wait after the load signal for client-side generation.
    pub settle_delay_ms: u64,
    /// Wait applied to each selector candidate.
    pub candidate_timeout_ms: u64,
    /// Maximum number of lines joined by the fallback harvester.
    pub fallback_line_cap: usize,
    /// Lines with this many trimmed characters or fewer are dropped.
    pub fallback_min_line_chars: usize,
    /// Hard floor for any returned answer.
    pub min_answer_chars: usize,
    /// Budget used when the caller does not supply one.
    pub default_timeout_ms: u64,
    /// Upper bound on concurrently open browser sessions.
    pub max_concurrent_sessions: usize,
    /// Elements removed before the fallback harvester reads page text.
    pub noise_selectors: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            extraction: ExtractionStrategy::SelectorsFirst,
            settle_delay_ms: 3_000,
            candidate_timeout_ms: 2_000,
            fallback_line_cap: 8,
            fallback_min_line_chars: 20,
            min_answer_chars: 10,
            default_timeout_ms: 30_000,
            max_concurrent_sessions: 2,
            noise_selectors: [
                "nav",
                "header",
                "footer",
                "aside",
                "script",
                "style",
                "noscript",
                "iframe",
                "[role='navigation']",
                "[role='banner']",
                "[class*='advert']",
                "ins.adsbygoogle",
                "[id*='google_ads']",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

impl PipelineConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn candidate_timeout(&self) -> Duration {
        Duration::from_millis(self.candidate_timeout_ms)
    }

    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }
}
