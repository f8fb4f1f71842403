//! End-to-end walk through the matcher engine with a `contain` matcher
//!
//! Run with: cargo run --example contain_matcher

use matchkit::{AssertionOutcome, CollectionArg, DefinitionBuilder, Value};

fn main() -> matchkit::Result<()> {
    matchkit::init_tracing();

    // Declared once per matcher type, typically at library load.
    let contain = DefinitionBuilder::<Vec<i64>>::new("contain")
        .collection_argument(CollectionArg::new("values").singular("value"))
        .single_assertion("has_elements", |eval| Ok(!eval.subject().is_empty()))
        .collection_assertion("is_included", |eval| {
            let wanted = eval.current().and_then(Value::as_integer);
            let found = wanted.is_some_and(|v| eval.subject().contains(&v));
            Ok(AssertionOutcome::of(found).with_default("include %{value}"))
        })
        .build()?;

    // Constructed once per expectation, like `subject.should contain(1, 2, 3)`.
    let mut matcher = contain.construct(vec![
        Value::from(1i64),
        Value::from(2i64),
        Value::from(3i64),
    ])?;

    println!("description: {}", matcher.description());

    let matched = matcher.matches(vec![1, 2, 3, 4])?;
    println!("against [1, 2, 3, 4]: {}", matched);

    let matched = matcher.matches(vec![4])?;
    println!("against [4]: {}", matched);
    println!("failure: {}", matcher.failure_message());
    println!("negative failure: {}", matcher.negative_failure_message());

    // The negated form, like `subject.should_not contain(9)`.
    let mut absent = contain.construct(vec![Value::from(9i64)])?.negative();
    println!("should_not contain(9) against [4]: {}", absent.matches(vec![4])?);

    Ok(())
}
