//! Heuristic that separates real generated content from false positives.
use scry_config::ValidatorConfig;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerdictReason {
    TooShort,
    Boilerplate,
    Ok,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidationVerdict {
    pub accepted: bool,
    pub reason: VerdictReason,
}

impl ValidationVerdict {
    fn reject(reason: VerdictReason) -> Self {
        Self {
            accepted: false,
            reason,
        }
    }

    fn ok() -> Self {
        Self {
            accepted: true,
            reason: VerdictReason::Ok,
        }
    }
}

/// Length floor plus boilerplate-prefix denylist.
///
/// Rules apply in order: trimmed length below `min_length` is `TooShort`,
/// then a matching prefix is `Boilerplate`, otherwise `Ok`. Lengths are in
/// characters and prefixes match case-insensitively.
#[derive(Debug, Clone)]
pub struct ContentValidator {
    min_length: usize,
    prefixes: Vec<String>,
}

impl ContentValidator {
    pub fn new(config: &ValidatorConfig) -> Self {
        Self {
            min_length: config.min_length,
            prefixes: config
                .boilerplate_prefixes
                .iter()
                .map(|p| p.trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn validate(&self, text: &str) -> ValidationVerdict {
        let trimmed = text.trim();
        if trimmed.chars().count() < self.min_length {
            return ValidationVerdict::reject(VerdictReason::TooShort);
        }
        if self.is_boilerplate(trimmed) {
            return ValidationVerdict::reject(VerdictReason::Boilerplate);
        }
        ValidationVerdict::ok()
    }

    /// Whether the trimmed text starts with a configured prefix.
    pub fn is_boilerplate(&self, text: &str) -> bool {
        let lowered = text.trim_start().to_lowercase();
        self.prefixes.iter().any(|p| lowered.starts_with(p.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn validator() -> ContentValidator {
        ContentValidator::new(&ValidatorConfig::default())
    }

    #[test]
    fn short_answer_is_too_short() {
        let verdict = validator().validate("The capital of France is Paris.");
        assert_eq!(verdict.reason, VerdictReason::TooShort);
        assert!(!verdict.accepted);
    }

    #[test]
    fn length_counts_after_trimming() {
        let padded = format!("   {}   ", "x".repeat(49));
        assert_eq!(validator().validate(&padded).reason, VerdictReason::TooShort);
        assert_eq!(validator().validate(&"x".repeat(50)).reason, VerdictReason::Ok);
    }

    #[test]
    fn sign_in_wall_is_boilerplate() {
        let text = "Sign in to continue. Create an account to unlock unlimited answers and history.";
        assert_eq!(validator().validate(text).reason, VerdictReason::Boilerplate);
        let shouting = "UPGRADE TO PRO for deeper research, file uploads and the newest models today";
        assert_eq!(validator().validate(shouting).reason, VerdictReason::Boilerplate);
    }

    #[test]
    fn real_answer_is_accepted() {
        let text = "Paris is the capital and most populous city of France, with an estimated population of two million.";
        assert_eq!(validator().validate(text), ValidationVerdict::ok());
    }

    #[test]
    fn thresholds_are_configurable() {
        let lenient = ContentValidator::new(&ValidatorConfig {
            min_length: 5,
            boilerplate_prefixes: vec!["Thinking".into()],
        });
        assert!(lenient.validate("Paris.").accepted);
        assert_eq!(
            lenient.validate("Thinking...").reason,
            VerdictReason::Boilerplate
        );
    }

    proptest! {
        #[test]
        fn anything_shorter_than_floor_is_too_short(s in "\\PC{0,49}") {
            let verdict = validator().validate(&s);
            prop_assert_eq!(verdict.reason, VerdictReason::TooShort);
        }

        #[test]
        fn boilerplate_prefix_rejected_at_any_length(
            idx in 0usize..10,
            tail in "[a-z ]{49,399}[a-z]",
        ) {
            let prefixes = scry_config::default_boilerplate_prefixes();
            let text = format!("{} {}", prefixes[idx % prefixes.len()], tail);
            prop_assert_eq!(validator().validate(&text).reason, VerdictReason::Boilerplate);
        }
    }
}
