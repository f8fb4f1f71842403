//! Instance construction
//!
//! Translates a constructing call's actual arguments into a bound
//! [`MatcherInstance`]: fixed positionals bind in declared order, a single
//! trailing mapping actual is diverted to the explicit options, remaining
//! positionals feed the collection, defaults are merged under the explicit
//! options, and after-initialize hooks run before the instance is returned.

use crate::definition::{BlockFn, MatcherDefinition};
use crate::error::{Error, Result};
use crate::matcher::{Bindings, MatcherInstance, Options, RunState};
use crate::value::Value;
use tracing::trace;

pub(crate) fn construct<S>(
    definition: &MatcherDefinition<S>,
    mut args: Vec<Value>,
    block: Option<BlockFn<S>>,
) -> Result<MatcherInstance<S>> {
    let fixed_names = definition.arguments().fixed();
    if args.len() < fixed_names.len() {
        return Err(Error::TooFewArguments {
            matcher: definition.name().to_string(),
            expected: fixed_names.len(),
            got: args.len(),
        });
    }

    // A trailing mapping actual is the options bundle, never an element.
    let explicit_options = if args.len() > fixed_names.len()
        && args.last().is_some_and(Value::is_map)
    {
        args.pop()
            .and_then(Value::into_map)
            .unwrap_or_default()
    } else {
        Default::default()
    };

    let rest = args.split_off(fixed_names.len());
    let mut arguments = Bindings::default();
    for (name, actual) in fixed_names.iter().zip(args) {
        arguments.insert(name.clone(), actual);
    }

    let collection = match definition.arguments().collection() {
        Some(_) => rest,
        None => {
            if !rest.is_empty() {
                return Err(Error::TooManyArguments {
                    matcher: definition.name().to_string(),
                    expected: fixed_names.len(),
                    got: fixed_names.len() + rest.len(),
                });
            }
            Vec::new()
        }
    };

    let mut options = Options::default();
    for (name, value) in definition.default_options().resolve() {
        options.insert(name, value);
    }
    for (name, value) in explicit_options {
        options.insert(name, value);
    }

    let stored_block = match definition.arguments().collection() {
        Some(spec) if spec.block_param.is_some() => block,
        _ => None,
    };

    trace!(
        matcher = definition.name(),
        collection_len = collection.len(),
        "matcher instance constructed"
    );

    let mut instance = MatcherInstance {
        definition: definition.clone(),
        arguments,
        collection,
        block: stored_block,
        options,
        negated: false,
        subject: None,
        run: RunState::default(),
    };

    for hook in definition.after_initialize_hooks() {
        let body = definition.hook_body(hook)?;
        body(&mut instance)
            .map_err(|source| Error::hook_body(definition.name(), &hook.name, source))?;
    }

    Ok(instance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{CollectionArg, DefinitionBuilder, OptionalSpec};
    use crate::value::options;

    fn contain() -> MatcherDefinition<Vec<i64>> {
        DefinitionBuilder::new("contain")
            .collection_argument(CollectionArg::new("values"))
            .optional(OptionalSpec::new("working"))
            .optional(OptionalSpec::new("other"))
            .default_options([("working", Value::Bool(true))])
            .build()
            .unwrap()
    }

    #[test]
    fn test_trailing_map_diverts_to_options() {
        let matcher = contain()
            .construct(vec![
                Value::Integer(1),
                Value::Integer(2),
                Value::Integer(3),
                options([("working", Value::Bool(false))]),
            ])
            .unwrap();

        assert_eq!(
            matcher.collection(),
            &[Value::Integer(1), Value::Integer(2), Value::Integer(3)]
        );
        assert_eq!(matcher.option("working"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_no_trailing_map_leaves_defaults() {
        let matcher = contain()
            .construct(vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)])
            .unwrap();

        assert_eq!(matcher.collection().len(), 3);
        assert_eq!(matcher.option("working"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_explicit_options_win_over_defaults() {
        let matcher = contain()
            .construct(vec![
                Value::Integer(1),
                options([
                    ("working", Value::Bool(false)),
                    ("other", Value::Integer(1)),
                ]),
            ])
            .unwrap();

        assert_eq!(matcher.option("working"), Some(&Value::Bool(false)));
        assert_eq!(matcher.option("other"), Some(&Value::Integer(1)));
    }

    #[test]
    fn test_too_few_arguments() {
        let def = DefinitionBuilder::<()>::new("validate_length_of")
            .fixed_arguments(["attribute"])
            .build()
            .unwrap();

        let err = def.construct(vec![]).unwrap_err();
        assert!(matches!(err, Error::TooFewArguments { expected: 1, got: 0, .. }));
    }

    #[test]
    fn test_extra_arguments_without_collection() {
        let def = DefinitionBuilder::<()>::new("respond_to")
            .fixed_arguments(["method"])
            .build()
            .unwrap();

        let err = def
            .construct(vec![Value::from("save"), Value::from("reload")])
            .unwrap_err();
        assert!(matches!(err, Error::TooManyArguments { .. }));
    }

    #[test]
    fn test_trailing_map_accepted_without_collection() {
        let def = DefinitionBuilder::<()>::new("respond_to")
            .fixed_arguments(["method"])
            .optional(OptionalSpec::new("strict"))
            .build()
            .unwrap();

        let matcher = def
            .construct(vec![
                Value::from("save"),
                options([("strict", Value::Bool(true))]),
            ])
            .unwrap();
        assert_eq!(matcher.option("strict"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_map_collection_element_not_diverted_when_last_is_not_trailing() {
        // Only the single trailing mapping is diverted; maps elsewhere in
        // the actuals stay collection elements.
        let matcher = contain()
            .construct(vec![
                options([("k", Value::Integer(1))]),
                Value::Integer(2),
            ])
            .unwrap();
        assert_eq!(matcher.collection().len(), 2);
    }

    #[test]
    fn test_after_initialize_hook_runs_and_propagates_errors() {
        let def = DefinitionBuilder::<()>::new("contain")
            .collection_argument(CollectionArg::new("values"))
            .optional(OptionalSpec::new("seeded"))
            .after_initialize(|instance| {
                instance.set("seeded", true)?;
                Ok(())
            })
            .build()
            .unwrap();
        let matcher = def.construct(vec![Value::Integer(1)]).unwrap();
        assert_eq!(matcher.option("seeded"), Some(&Value::Bool(true)));

        let failing = DefinitionBuilder::<()>::new("contain")
            .collection_argument(CollectionArg::new("values"))
            .after_initialize(|_| anyhow::bail!("bad setup"))
            .build()
            .unwrap();
        let err = failing.construct(vec![Value::Integer(1)]).unwrap_err();
        assert!(matches!(err, Error::HookBody { .. }));
    }
}
