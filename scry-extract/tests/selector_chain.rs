mod common;

use common::{FakeLauncher, PageScript};
use proptest::prelude::*;
use scry_config::{SelectorCandidate, SelectorRole, ValidatorConfig};
use scry_drivers::PageLauncher;
use scry_extract::{ContentValidator, PageSession, Resolution, SelectorChain};
use std::time::Duration;

fn locator(i: usize) -> String {
    format!("div.answer-{i}")
}

fn candidate_text() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("Paris.".to_string())),
        "Sign in [a-z ]{40,80}".prop_map(Some),
        "[A-Za-z ,.]{0,120}".prop_map(Some),
    ]
}

fn resolve(texts: &[Option<String>]) -> Resolution<String> {
    let mut script = PageScript::default();
    for (i, text) in texts.iter().enumerate() {
        if let Some(text) = text {
            script = script.with_element(&locator(i), text);
        }
    }
    let chain = SelectorChain::new(
        SelectorRole::Answer,
        (0..texts.len()).map(|i| SelectorCandidate::new(locator(i), SelectorRole::Answer)),
        Duration::from_millis(1),
    );
    let validator = ContentValidator::new(&ValidatorConfig::default());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    runtime.block_on(async {
        let (launcher, _probe) = FakeLauncher::new(script);
        let session = PageSession::new(launcher.launch().await.unwrap());
        let resolution = chain.resolve(&session, &validator).await;
        session.close().await;
        resolution
    })
}

proptest! {
    #[test]
    fn resolved_text_always_passes_validation(texts in prop::collection::vec(candidate_text(), 0..6)) {
        let validator = ContentValidator::new(&ValidatorConfig::default());
        let first_valid = texts
            .iter()
            .position(|t| t.as_deref().is_some_and(|t| validator.validate(t).accepted));

        match (resolve(&texts), first_valid) {
            (Resolution::Matched(m), Some(expected)) => {
                prop_assert!(validator.validate(&m.text).accepted);
                prop_assert_eq!(m.position, expected);
                prop_assert_eq!(m.candidate.locator, locator(expected));
            }
            (Resolution::Exhausted, None) => {}
            (Resolution::Matched(m), None) => {
                prop_assert!(false, "matched {} with no valid candidate", m.candidate.locator);
            }
            (Resolution::Exhausted, Some(i)) => {
                prop_assert!(false, "exhausted although candidate {} is valid", i);
            }
        }
    }
}
