//! Resilient answer extraction from a dynamically rendered page.
//!
//! - [`session::PageSession`]: exclusive lifecycle of one browser tab
//! - [`selector::SelectorChain`]: ordered locator fallbacks per semantic role
//! - [`validator::ContentValidator`]: length and boilerplate heuristics
//! - [`fallback::FallbackExtractor`]: whole-document text harvesting
//! - [`pipeline::ExtractionPipeline`]: the single `extract_answer` operation
//!
//! The browser itself is reached through [`scry_drivers::BrowserPage`], so
//! everything here runs equally against WebDriver or an in-memory page.

pub mod fallback;
pub mod pipeline;
pub mod selector;
pub mod session;
pub mod target;
pub mod validator;

pub use fallback::FallbackExtractor;
pub use pipeline::{AnswerSource, ExtractionPipeline, ExtractionResult};
pub use selector::{ChainMatch, Resolution, SelectorChain};
pub use session::PageSession;
pub use target::{NavigationTarget, Prompt, MAX_PROMPT_CHARS};
pub use validator::{ContentValidator, ValidationVerdict, VerdictReason};
