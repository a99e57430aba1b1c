//! Ordered fallback chains of locators for one semantic target.
use crate::{session::PageSession, validator::ContentValidator};
use scry_common::{ExtractError, Result};
use scry_config::{ScryConfig, SelectorCandidate, SelectorRole};
use scry_drivers::BrowserPage;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Candidates for one role in priority order: newest known layout first,
/// generic tags last.
#[derive(Debug, Clone)]
pub struct SelectorChain {
    role: SelectorRole,
    candidates: Vec<SelectorCandidate>,
    wait: Duration,
}

/// Located and validated answer text.
#[derive(Debug, Clone)]
pub struct ChainMatch<E> {
    pub element: E,
    pub candidate: SelectorCandidate,
    /// Priority index of the candidate within its chain.
    pub position: usize,
    pub text: String,
}

#[derive(Debug, Clone)]
pub enum Resolution<E> {
    Matched(ChainMatch<E>),
    /// No candidate both located and validated.
    Exhausted,
}

impl<E> Resolution<E> {
    /// Convert `Exhausted` into the internal [`ExtractError::NoMatchFound`] signal.
    pub fn ok_or_no_match(self) -> Result<ChainMatch<E>> {
        match self {
            Self::Matched(m) => Ok(m),
            Self::Exhausted => Err(ExtractError::NoMatchFound),
        }
    }
}

impl SelectorChain {
    /// Keep the candidates tagged with `role`, in their given order.
    pub fn new(
        role: SelectorRole,
        candidates: impl IntoIterator<Item = SelectorCandidate>,
        wait: Duration,
    ) -> Self {
        Self {
            role,
            candidates: candidates.into_iter().filter(|c| c.role == role).collect(),
            wait,
        }
    }

    pub fn from_config(config: &ScryConfig, role: SelectorRole) -> Self {
        Self::new(
            role,
            config.candidates(role),
            config.pipeline.candidate_timeout(),
        )
    }

    pub fn role(&self) -> SelectorRole {
        self.role
    }

    pub fn candidates(&self) -> &[SelectorCandidate] {
        &self.candidates
    }

    /// First candidate that locates anything; used for input and submit
    /// controls, which carry no text to validate.
    pub async fn locate<P: BrowserPage>(
        &self,
        session: &PageSession<P>,
    ) -> Option<(P::Element, &SelectorCandidate)> {
        for candidate in &self.candidates {
            match session.locate(&candidate.locator, self.wait).await {
                Ok(Some(element)) => {
                    debug!(target: "scry.selector", role = ?self.role, locator = %candidate.locator, "located");
                    return Some((element, candidate));
                }
                Ok(None) => continue,
                Err(e) => {
                    warn!(target: "scry.selector", locator = %candidate.locator, error = %format!("{e:#}"), "lookup failed");
                }
            }
        }
        None
    }

    /// First candidate that both locates and passes `validator`.
    ///
    /// A candidate that locates but fails validation, or whose lookup errors,
    /// does not end the chain.
    pub async fn resolve<P: BrowserPage>(
        &self,
        session: &PageSession<P>,
        validator: &ContentValidator,
    ) -> Resolution<P::Element> {
        for (position, candidate) in self.candidates.iter().enumerate() {
            let element = match session.locate(&candidate.locator, self.wait).await {
                Ok(Some(element)) => element,
                Ok(None) => {
                    debug!(target: "scry.selector", locator = %candidate.locator, "not found");
                    continue;
                }
                Err(e) => {
                    warn!(target: "scry.selector", locator = %candidate.locator, error = %format!("{e:#}"), "lookup failed");
                    continue;
                }
            };

            let text = match session.read_text(&element).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(target: "scry.selector", locator = %candidate.locator, error = %format!("{e:#}"), "text read failed");
                    continue;
                }
            };

            let verdict = validator.validate(&text);
            if !verdict.accepted {
                debug!(
                    target: "scry.validator",
                    locator = %candidate.locator,
                    reason = ?verdict.reason,
                    chars = text.trim().chars().count(),
                    "candidate rejected"
                );
                continue;
            }

            info!(target: "scry.selector", locator = %candidate.locator, position, "answer container matched");
            return Resolution::Matched(ChainMatch {
                element,
                candidate: candidate.clone(),
                position,
                text,
            });
        }
        Resolution::Exhausted
    }
}
