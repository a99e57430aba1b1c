//! Common types and utilities shared across Scry crates.
//!
//! This crate defines the error taxonomy surfaced by the extraction pipeline,
//! the pipeline state names used in logs and errors, and the observability
//! helpers. It stays dependency‑light so every crate in the workspace can
//! depend on it.
//!
//! # Overview
//!
//! - [`ExtractError`] and [`Result`]: typed failures of one extraction run
//! - [`ErrorKind`]: stable, serializable discriminant for boundary layers
//! - [`PipelineState`]: the states an extraction run moves through
//! - [`observability`]: centralised tracing/logging initialisation
//!
//! # Examples
//!
//! Mapping an error to something a transport layer can act on:
//!
//! ```rust
//! use scry_common::{ErrorKind, ExtractError, PipelineState};
//!
//! let err = ExtractError::Timeout { state: PipelineState::Navigated };
//! assert_eq!(err.kind(), ErrorKind::Timeout);
//! assert!(err.kind().is_timeout());
//! ```
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod observability;

/// States of a single extraction run.
///
/// `Start → Navigated → {SelectorMatched | SelectorExhausted} → {Validated | Fallback} → Done | Failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Start,
    Navigated,
    SelectorMatched,
    SelectorExhausted,
    Validated,
    Fallback,
    Done,
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::Navigated => "navigated",
            Self::SelectorMatched => "selector_matched",
            Self::SelectorExhausted => "selector_exhausted",
            Self::Validated => "validated",
            Self::Fallback => "fallback",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Error kinds surfaced by one `extract_answer` call.
///
/// Every variant is terminal for the call; nothing is retried internally.
#[derive(thiserror::Error, Debug)]
pub enum ExtractError {
    /// The page failed to load or settle within the budget, or the browser
    /// could not be started at all.
    #[error("Navigation error: {0}")]
    Navigation(String),

    /// The navigation budget expired before the page loaded and settled.
    #[error("Navigation error: timed out after {after_ms}ms")]
    NavigationTimeout { after_ms: u64 },

    /// No selector candidate both located and validated.
    ///
    /// Internal signal only: the pipeline always follows it with fallback
    /// extraction and never returns it to callers.
    #[error("No selector candidate matched")]
    NoMatchFound,

    /// The whole-document harvester found zero usable lines.
    #[error("No content extracted: {0}")]
    NoContentExtracted(String),

    /// The final answer is shorter than the minimum-length invariant.
    #[error("Answer too short: {chars} chars (minimum {min})")]
    AnswerTooShort { chars: usize, min: usize },

    /// The overall budget expired after navigation completed.
    #[error("Timed out in state {state}")]
    Timeout { state: PipelineState },

    /// The prompt is empty or longer than the accepted maximum.
    #[error("Invalid prompt: {0}")]
    InvalidPrompt(String),
}

impl ExtractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Navigation(_) => ErrorKind::Navigation,
            Self::NavigationTimeout { .. } => ErrorKind::NavigationTimeout,
            Self::NoMatchFound => ErrorKind::NoMatchFound,
            Self::NoContentExtracted(_) => ErrorKind::NoContentExtracted,
            Self::AnswerTooShort { .. } => ErrorKind::AnswerTooShort,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::InvalidPrompt(_) => ErrorKind::InvalidPrompt,
        }
    }
}

/// Stable discriminant of [`ExtractError`], suitable for mapping onto
/// transport statuses (timeout vs. no-content vs. upstream-format-changed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Navigation,
    NavigationTimeout,
    NoMatchFound,
    NoContentExtracted,
    AnswerTooShort,
    Timeout,
    InvalidPrompt,
}

impl ErrorKind {
    pub fn is_timeout(self) -> bool {
        matches!(self, Self::NavigationTimeout | Self::Timeout)
    }
}

/// Convenient alias for results that use [`ExtractError`].
pub type Result<T> = std::result::Result<T, ExtractError>;
