use scry_common::{ExtractError, Result};
use scry_config::{NavigationMode, TargetConfig};
use url::Url;

/// Longest prompt accepted, in characters.
pub const MAX_PROMPT_CHARS: usize = 500;

/// A user question, 1–500 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt(String);

impl Prompt {
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ExtractError::InvalidPrompt("prompt is empty".into()));
        }
        let chars = raw.chars().count();
        if chars > MAX_PROMPT_CHARS {
            return Err(ExtractError::InvalidPrompt(format!(
                "prompt is {chars} chars (maximum {MAX_PROMPT_CHARS})"
            )));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Where a run navigates first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTarget {
    /// Query-string URL that renders the answer without interaction.
    Direct { url: Url },
    /// Landing page where the prompt is typed and submitted.
    Interactive { url: Url, prompt: String },
}

impl NavigationTarget {
    pub fn for_prompt(target: &TargetConfig, prompt: &Prompt) -> Result<Self> {
        let base = Url::parse(&target.base_url)
            .map_err(|e| ExtractError::Navigation(format!("invalid base url: {e}")))?;

        match target.mode {
            NavigationMode::Direct => {
                let mut url = base
                    .join(&target.search_path)
                    .map_err(|e| ExtractError::Navigation(format!("invalid search path: {e}")))?;
                url.query_pairs_mut()
                    .append_pair(&target.query_param, prompt.as_str());
                Ok(Self::Direct { url })
            }
            NavigationMode::Interactive => Ok(Self::Interactive {
                url: base,
                prompt: prompt.as_str().to_string(),
            }),
        }
    }

    pub fn url(&self) -> &Url {
        match self {
            Self::Direct { url } | Self::Interactive { url, .. } => url,
        }
    }
}
