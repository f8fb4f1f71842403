//! Integration tests for message composition: layered template lookup,
//! interpolation context, optional clauses and scope keys

use matchkit::{
    register_catalog, AssertionOutcome, Catalog, CollectionArg, DefinitionBuilder,
    MatcherDefinition, OptionalSpec, Value,
};
use pretty_assertions::assert_eq;

fn length_of(name: &str) -> MatcherDefinition<String> {
    DefinitionBuilder::<String>::new(name)
        .namespace("model")
        .fixed_arguments(["attribute"])
        .optional(OptionalSpec::new("within"))
        .optional(OptionalSpec::new("allow_nil"))
        .single_assertion("is_long_enough", |eval| {
            let min = match eval.option("within") {
                Some(Value::Range { start, .. }) => *start,
                _ => 0,
            };
            Ok(AssertionOutcome::of(eval.subject().len() as i64 >= min))
        })
        .build()
        .expect("length matcher definition")
}

#[test]
fn test_scoped_key_outranks_global_key() {
    register_catalog(
        "en",
        Catalog::new()
            .with("expectations.is_long_enough", "be long enough")
            .with(
                "model.scoped_length.expectations.is_long_enough",
                "have at least %{within} characters in %{attribute}",
            ),
    );

    let mut matcher = length_of("scoped_length")
        .construct(vec![Value::from("name")])
        .unwrap()
        .with("within", 5..10)
        .unwrap();

    assert!(!matcher.matches("ab".to_string()).unwrap());
    assert_eq!(
        matcher.failure_message(),
        "Expected \"ab\" to have at least 5..10 characters in \"name\""
    );
}

#[test]
fn test_global_key_when_no_scoped_key() {
    register_catalog(
        "en",
        Catalog::new().with("expectations.is_long_enough", "be long enough"),
    );

    let mut matcher = length_of("global_length")
        .construct(vec![Value::from("name")])
        .unwrap()
        .with("within", 5..10)
        .unwrap();

    assert!(!matcher.matches("ab".to_string()).unwrap());
    assert_eq!(matcher.failure_message(), "Expected \"ab\" to be long enough");
}

#[test]
fn test_inline_default_then_generated_sentence() {
    let def = DefinitionBuilder::<Vec<i64>>::new("unlisted")
        .single_assertion("with_inline_default", |_eval| {
            Ok(AssertionOutcome::fail().with_default("carry an inline message"))
        })
        .build()
        .unwrap();
    let mut matcher = def.construct(vec![]).unwrap();
    assert!(!matcher.matches(vec![]).unwrap());
    assert_eq!(
        matcher.failure_message(),
        "Expected [] to carry an inline message"
    );

    let def = DefinitionBuilder::<Vec<i64>>::new("unlisted_too")
        .single_assertion("has_exactly_one_owner", |_eval| Ok(false))
        .build()
        .unwrap();
    let mut matcher = def.construct(vec![]).unwrap();
    assert!(!matcher.matches(vec![]).unwrap());
    assert_eq!(
        matcher.failure_message(),
        "Expected [] to has exactly one owner"
    );
}

#[test]
fn test_description_template_with_interpolation() {
    register_catalog(
        "en",
        Catalog::new().with(
            "model.described_length.description",
            "validate length of %{attribute}",
        ),
    );

    let matcher = length_of("described_length")
        .construct(vec![Value::from("name")])
        .unwrap();
    assert_eq!(matcher.description(), "validate length of \"name\"");
}

#[test]
fn test_optional_clauses_in_declaration_order() {
    register_catalog(
        "en",
        Catalog::new()
            .with("model.clause_length.description", "validate length of %{attribute}")
            .with("model.clause_length.optionals.within.given", "within %{value}")
            .with("model.clause_length.optionals.allow_nil.positive", "allowing nil")
            .with("model.clause_length.optionals.allow_nil.negative", "forbidding nil"),
    );

    let matcher = length_of("clause_length")
        .construct(vec![Value::from("name")])
        .unwrap()
        .with("within", 2..3)
        .unwrap()
        .with("allow_nil", true)
        .unwrap();
    assert_eq!(
        matcher.description(),
        "validate length of \"name\" within 2..3 and allowing nil"
    );

    let matcher = length_of("clause_length")
        .construct(vec![Value::from("name")])
        .unwrap()
        .with("allow_nil", false)
        .unwrap();
    assert_eq!(
        matcher.description(),
        "validate length of \"name\" forbidding nil"
    );

    // Unset optionals with no not_given template are omitted entirely.
    let matcher = length_of("clause_length")
        .construct(vec![Value::from("name")])
        .unwrap();
    assert_eq!(matcher.description(), "validate length of \"name\"");
}

#[test]
fn test_both_polarities_compose_from_one_run() {
    let def = DefinitionBuilder::<Vec<i64>>::new("emptiness")
        .single_assertion("is_empty", |eval| {
            Ok(AssertionOutcome::of(eval.subject().is_empty()).with_default("be empty"))
        })
        .build()
        .unwrap();

    let mut matcher = def.construct(vec![]).unwrap();
    assert!(!matcher.matches(vec![1]).unwrap());

    // The harness picks the framing; both are available from the same run.
    assert_eq!(matcher.failure_message(), "Expected [1] to be empty");
    assert_eq!(matcher.negative_failure_message(), "Expected [1] not to be empty");
}

#[test]
fn test_collection_sentence_variants() {
    let contain = |values: &[i64]| {
        DefinitionBuilder::<Vec<i64>>::new("contain")
            .collection_argument(CollectionArg::new("values"))
            .build()
            .unwrap()
            .construct(values.iter().copied().map(Value::from).collect())
            .unwrap()
    };

    assert_eq!(contain(&[1]).description(), "contain 1");
    assert_eq!(contain(&[1, 2]).description(), "contain 1 and 2");
    assert_eq!(contain(&[1, 2, 3]).description(), "contain 1, 2, and 3");
}

#[test]
fn test_assertion_context_overrides_interpolation() {
    let def = DefinitionBuilder::<Vec<i64>>::new("sized")
        .single_assertion("has_expected_size", |eval| {
            let actual = eval.subject().len();
            Ok(AssertionOutcome::of(actual == 2)
                .with("actual", actual)
                .with_default("have 2 elements, got %{actual}"))
        })
        .build()
        .unwrap();

    let mut matcher = def.construct(vec![]).unwrap();
    assert!(!matcher.matches(vec![1, 2, 3]).unwrap());
    assert_eq!(
        matcher.failure_message(),
        "Expected [1, 2, 3] to have 2 elements, got 3"
    );
}

#[test]
fn test_messages_without_a_run_use_description() {
    let matcher = length_of("unevaluated_length")
        .construct(vec![Value::from("name")])
        .unwrap();

    // No run has happened; the accessors still answer with a total string.
    assert_eq!(
        matcher.failure_message(),
        "Expected the subject to unevaluated length"
    );
}
