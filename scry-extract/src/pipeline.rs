//! Orchestration of one extraction run.
//!
//! `Start → Navigated → {SelectorMatched | SelectorExhausted} → {Validated | Fallback} → Done | Failed`
//!
//! With [`ExtractionStrategy::FallbackOnly`] a run goes from `Navigated`
//! straight to `Fallback`.
//!
//! Every run owns its own browser session, which is closed exactly once on
//! every exit path, including budget expiry. Nothing is retried internally.
use crate::{
    fallback::FallbackExtractor,
    selector::SelectorChain,
    session::PageSession,
    target::{NavigationTarget, Prompt},
    validator::ContentValidator,
};
use scry_common::{ExtractError, PipelineState, Result};
use scry_config::{ExtractionStrategy, ScryConfig, SelectorRole};
use scry_drivers::{BrowserPage, PageLauncher};
use serde::Serialize;
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::Semaphore,
    time::{timeout_at, Instant},
};
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnswerSource {
    Selector,
    Fallback,
}

/// Outcome of one successful run.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Trimmed answer, never shorter than the configured minimum.
    pub text: String,
    pub source: AnswerSource,
    pub elapsed_ms: u64,
    /// Locator that produced the answer when `source` is `Selector`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locator: Option<String>,
}

struct Inner<L> {
    launcher: L,
    config: Arc<ScryConfig>,
    validator: ContentValidator,
    fallback: FallbackExtractor,
    input_chain: SelectorChain,
    submit_chain: SelectorChain,
    answer_chain: SelectorChain,
    sessions: Semaphore,
}

/// Cheap to clone; clones share the launcher, the read-only configuration
/// and the bound on concurrently open sessions.
pub struct ExtractionPipeline<L> {
    inner: Arc<Inner<L>>,
}

impl<L> Clone for ExtractionPipeline<L> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

fn advance(state: &mut PipelineState, next: PipelineState) {
    debug!(target: "scry.pipeline", from = %state, to = %next, "transition");
    *state = next;
}

fn elapsed_ms(since: Instant) -> u64 {
    since.elapsed().as_millis() as u64
}

impl<L: PageLauncher> ExtractionPipeline<L> {
    pub fn new(launcher: L, config: Arc<ScryConfig>) -> Self {
        let inner = Inner {
            validator: ContentValidator::new(&config.validator),
            fallback: FallbackExtractor::new(&config),
            input_chain: SelectorChain::from_config(&config, SelectorRole::Input),
            submit_chain: SelectorChain::from_config(&config, SelectorRole::Submit),
            answer_chain: SelectorChain::from_config(&config, SelectorRole::Answer),
            sessions: Semaphore::new(config.pipeline.max_concurrent_sessions.max(1)),
            launcher,
            config,
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn config(&self) -> &ScryConfig {
        &self.inner.config
    }

    /// [`Self::extract_answer`] with the configured default budget.
    pub async fn extract_answer_default(&self, prompt: &str) -> Result<ExtractionResult> {
        let budget = self.inner.config.pipeline.default_timeout();
        self.extract_answer(prompt, budget).await
    }

    /// Produce the answer for `prompt` within `budget`.
    pub async fn extract_answer(&self, prompt: &str, budget: Duration) -> Result<ExtractionResult> {
        let prompt = Prompt::new(prompt)?;
        let target = NavigationTarget::for_prompt(&self.inner.config.target, &prompt)?;
        let run_id = Uuid::new_v4();
        let span = info_span!("extract", %run_id, url = %target.url());

        self.run(target, budget).instrument(span).await
    }

    async fn run(&self, target: NavigationTarget, budget: Duration) -> Result<ExtractionResult> {
        let started = Instant::now();
        let deadline = started + budget;

        let _permit = match timeout_at(deadline, self.inner.sessions.acquire()).await {
            Ok(Ok(permit)) => permit,
            Ok(Err(_)) => return Err(ExtractError::Navigation("session pool closed".into())),
            Err(_) => {
                warn!(target: "scry.pipeline", "no session slot within budget");
                return Err(ExtractError::NavigationTimeout {
                    after_ms: elapsed_ms(started),
                });
            }
        };

        let page = match timeout_at(deadline, self.inner.launcher.launch()).await {
            Ok(Ok(page)) => page,
            Ok(Err(e)) => {
                warn!(target: "scry.pipeline", error = %format!("{e:#}"), "browser launch failed");
                return Err(ExtractError::Navigation(format!("browser launch failed: {e:#}")));
            }
            Err(_) => {
                return Err(ExtractError::NavigationTimeout {
                    after_ms: elapsed_ms(started),
                })
            }
        };

        let mut session = PageSession::new(page);
        let mut state = PipelineState::Start;
        let outcome = timeout_at(
            deadline,
            self.drive(&mut session, &target, budget, &mut state),
        )
        .await;
        session.close().await;

        let outcome = match outcome {
            Ok(result) => result,
            Err(_) if state == PipelineState::Start => Err(ExtractError::NavigationTimeout {
                after_ms: elapsed_ms(started),
            }),
            Err(_) => Err(ExtractError::Timeout { state }),
        };

        match outcome {
            Ok(mut result) => {
                result.elapsed_ms = elapsed_ms(started);
                info!(
                    target: "scry.pipeline",
                    source = ?result.source,
                    chars = result.text.chars().count(),
                    elapsed_ms = result.elapsed_ms,
                    "answer extracted"
                );
                Ok(result)
            }
            Err(err) => {
                warn!(
                    target: "scry.pipeline",
                    last_state = %state,
                    state = %PipelineState::Failed,
                    kind = ?err.kind(),
                    error = %err,
                    "extraction failed"
                );
                Err(err)
            }
        }
    }

    async fn drive<P: BrowserPage>(
        &self,
        session: &mut PageSession<P>,
        target: &NavigationTarget,
        budget: Duration,
        state: &mut PipelineState,
    ) -> Result<ExtractionResult> {
        self.navigate(session, target, budget).await?;
        advance(state, PipelineState::Navigated);

        let resolution = match self.inner.config.pipeline.extraction {
            ExtractionStrategy::SelectorsFirst => {
                self.inner
                    .answer_chain
                    .resolve(session, &self.inner.validator)
                    .await
                    .ok_or_no_match()
            }
            ExtractionStrategy::FallbackOnly => {
                debug!(target: "scry.pipeline", "selector chain skipped");
                Err(ExtractError::NoMatchFound)
            }
        };

        let (text, source, locator) = match resolution {
            Ok(matched) => {
                advance(state, PipelineState::SelectorMatched);
                advance(state, PipelineState::Validated);
                (matched.text, AnswerSource::Selector, Some(matched.candidate.locator))
            }
            Err(ExtractError::NoMatchFound) => {
                if self.inner.config.pipeline.extraction == ExtractionStrategy::SelectorsFirst {
                    advance(state, PipelineState::SelectorExhausted);
                }
                advance(state, PipelineState::Fallback);
                let text = self.inner.fallback.harvest(session).await?;
                (text, AnswerSource::Fallback, None)
            }
            Err(other) => return Err(other),
        };

        let text = text.trim().to_string();
        let chars = text.chars().count();
        let min = self.inner.config.pipeline.min_answer_chars;
        if chars < min {
            return Err(ExtractError::AnswerTooShort { chars, min });
        }

        advance(state, PipelineState::Done);
        Ok(ExtractionResult {
            text,
            source,
            elapsed_ms: 0,
            locator,
        })
    }

    /// `Start → Navigated`: load, optionally submit the prompt, then settle.
    async fn navigate<P: BrowserPage>(
        &self,
        session: &mut PageSession<P>,
        target: &NavigationTarget,
        budget: Duration,
    ) -> Result<()> {
        session.open(target, budget).await?;

        if let NavigationTarget::Interactive { prompt, .. } = target {
            self.submit_prompt(session, prompt).await?;
        }

        session
            .settle(self.inner.config.pipeline.settle_delay())
            .await;
        Ok(())
    }

    async fn submit_prompt<P: BrowserPage>(
        &self,
        session: &PageSession<P>,
        prompt: &str,
    ) -> Result<()> {
        let (input, candidate) = self
            .inner
            .input_chain
            .locate(session)
            .await
            .ok_or_else(|| ExtractError::Navigation("no input control located".into()))?;
        debug!(target: "scry.pipeline", locator = %candidate.locator, "typing prompt");

        session
            .fill(&input, prompt)
            .await
            .map_err(|e| ExtractError::Navigation(format!("typing prompt failed: {e:#}")))?;

        let submitted = match self.inner.submit_chain.locate(session).await {
            Some((button, _)) => session.click(&button).await,
            None => session.press_enter(&input).await,
        };
        submitted.map_err(|e| ExtractError::Navigation(format!("submitting prompt failed: {e:#}")))
    }
}
