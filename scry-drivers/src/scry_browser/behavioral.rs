use anyhow::Result;
use fantoccini::elements::Element;
use rand::rngs::OsRng;
use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;

#[derive(Debug, Clone)]
/// Produces human‑like delays and typing behavior to reduce automation signals.
pub struct BehavioralEngine {
    key_delay_ms: (u64, u64),
}

impl Default for BehavioralEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl BehavioralEngine {
    pub fn new() -> Self {
        Self {
            key_delay_ms: (30, 120),
        }
    }

    /// Sleep for a random duration between `min` and `max` milliseconds.
    pub async fn random_delay(&self, min: u64, max: u64) {
        sleep(Duration::from_millis(pick_delay(min, max))).await;
    }

    /// Type the provided text one word at a time with small random pauses.
    ///
    /// Word chunks keep a 500-character prompt well inside a typical request
    /// budget while still avoiding a single synthetic paste.
    pub async fn type_text_human_like(&self, element: &Element, text: &str) -> Result<()> {
        for chunk in word_chunks(text) {
            element.send_keys(chunk).await?;
            self.random_delay(self.key_delay_ms.0, self.key_delay_ms.1)
                .await;
        }
        Ok(())
    }
}

fn pick_delay(min: u64, max: u64) -> u64 {
    if min >= max {
        return min;
    }
    OsRng.gen_range(min..=max)
}

/// Split into words, each keeping its trailing whitespace.
fn word_chunks(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive(char::is_whitespace)
}
