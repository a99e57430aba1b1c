//! Driver layer for browser automation.
//!
//! This crate exposes the page capability the extraction pipeline is written
//! against, and the WebDriver implementation of it.
//!
//! - [`scry_browser::BrowserPage`] / [`scry_browser::PageLauncher`]: the capability traits
//! - [`scry_browser::driver::ChromeLauncher`]: starts one chromedriver session per launch
//! - [`scry_browser::page::ScryPage`]: `fantoccini`-backed page
//! - [`scry_browser::behavioral::BehavioralEngine`]: human‑like timings and typing
//! - [`scry_browser::stealth`]: launch arguments and JS evasions
pub mod scry_browser;

pub use scry_browser::{BrowserPage, PageLauncher};
