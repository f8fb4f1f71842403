//! Integration tests for locale selection
//!
//! These tests mutate the process-wide active locale, so they live in their
//! own binary and are serialized.

use matchkit::{
    active_locale, register_catalog, set_active_locale, AssertionOutcome, Catalog,
    DefinitionBuilder, MatcherDefinition,
};
use serial_test::serial;

fn emptiness(name: &str) -> MatcherDefinition<Vec<i64>> {
    DefinitionBuilder::<Vec<i64>>::new(name)
        .single_assertion("is_empty", |eval| {
            Ok(AssertionOutcome::of(eval.subject().is_empty()).with_default("be empty"))
        })
        .build()
        .unwrap()
}

#[test]
#[serial]
fn test_active_locale_defaults_to_en() {
    assert_eq!(active_locale().code(), "en");
}

#[test]
#[serial]
fn test_locale_catalog_overrides_framing() {
    register_catalog(
        "pt-BR",
        Catalog::new()
            .with("failure", "Esperava que %{subject} pudesse %{expectation}")
            .with("expectations.is_empty", "estar vazio"),
    );

    set_active_locale("pt-BR");
    let mut matcher = emptiness("vazio").construct(vec![]).unwrap();
    let outcome = matcher.matches(vec![1]);
    set_active_locale("en");

    assert!(!outcome.unwrap());
    assert_eq!(
        matcher.failure_message(),
        "Esperava que [1] pudesse estar vazio"
    );
}

#[test]
#[serial]
fn test_missing_locale_keys_fall_back_to_default_locale() {
    register_catalog(
        "pt-BR",
        Catalog::new().with("failure", "Esperava que %{subject} pudesse %{expectation}"),
    );

    // An assertion name no other test registers templates for, in any
    // locale, so only its inline default can supply the sentence.
    let def = DefinitionBuilder::<Vec<i64>>::new("blankness")
        .single_assertion("is_blank", |eval| {
            Ok(AssertionOutcome::of(eval.subject().is_empty()).with_default("be blank"))
        })
        .build()
        .unwrap();

    set_active_locale("pt-BR");
    let mut matcher = def.construct(vec![]).unwrap();
    let outcome = matcher.matches(vec![1]);
    set_active_locale("en");

    assert!(!outcome.unwrap());
    // negative_failure has no pt-BR entry and resolves through the default
    // locale catalog instead.
    assert_eq!(
        matcher.negative_failure_message(),
        "Expected [1] not to be blank"
    );
}

#[test]
#[serial]
fn test_run_snapshots_locale_at_matches_time() {
    register_catalog(
        "pt-BR",
        Catalog::new().with("failure", "Esperava que %{subject} pudesse %{expectation}"),
    );

    set_active_locale("pt-BR");
    let mut matcher = emptiness("snapshot_check").construct(vec![]).unwrap();
    let outcome = matcher.matches(vec![1]);
    // Switching after the run must not change the composed message.
    set_active_locale("en");

    assert!(!outcome.unwrap());
    assert!(matcher.failure_message().starts_with("Esperava"));
}
