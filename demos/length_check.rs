//! A model-style matcher with fixed arguments, optionals and templates
//!
//! Shows how a domain matcher library would declare a
//! `validate_length_of(:name).within(2..30).allow_nil` style check on top
//! of the engine, including registered message templates.
//!
//! Run with: cargo run --example length_check

use matchkit::{
    register_catalog, AssertionOutcome, Catalog, DefinitionBuilder, OptionalSpec, Value,
};

#[derive(Debug)]
struct Profile {
    name: Option<String>,
}

fn main() -> matchkit::Result<()> {
    matchkit::init_tracing();

    register_catalog(
        "en",
        Catalog::from_json(
            r#"{
                "model": {
                    "validate_length_of": {
                        "description": "validate length of %{attribute}",
                        "optionals": {
                            "within": {"given": "within %{value}"},
                            "allow_nil": {"positive": "allowing nil"}
                        },
                        "expectations": {
                            "fits_bounds": "keep %{attribute} within %{within}"
                        }
                    }
                }
            }"#,
        )
        .expect("valid catalog json"),
    );

    let validate_length_of = DefinitionBuilder::<Profile>::new("validate_length_of")
        .namespace("model")
        .fixed_arguments(["attribute"])
        .optional(OptionalSpec::new("within"))
        .optional(OptionalSpec::new("allow_nil").default_value(true).alias("allows_nil"))
        .single_assertion("fits_bounds", |eval| {
            let (min, max) = match eval.option("within") {
                Some(Value::Range { start, end, .. }) => (*start, *end),
                _ => (0, i64::MAX),
            };
            match &eval.subject().name {
                Some(name) => {
                    let len = name.len() as i64;
                    Ok(AssertionOutcome::of(len >= min && len < max))
                }
                None => Ok(AssertionOutcome::of(eval.option_is("allow_nil"))),
            }
        })
        .build()?;

    let mut matcher = validate_length_of
        .construct(vec![Value::from("name")])?
        .with("within", 2..30)?
        .enable("allow_nil")?;

    println!("description: {}", matcher.description());

    let ok = matcher.matches(Profile {
        name: Some("Ada Lovelace".to_string()),
    })?;
    println!("with a reasonable name: {}", ok);

    let ok = matcher.matches(Profile {
        name: Some("A".to_string()),
    })?;
    println!("with a one-letter name: {}", ok);
    println!("failure: {}", matcher.failure_message());

    let ok = matcher.matches(Profile { name: None })?;
    println!("with a nil name (allow_nil): {}", ok);

    Ok(())
}
