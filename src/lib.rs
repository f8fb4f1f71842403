//! Declarative matcher DSL engine
//!
//! This library is the engine underneath matcher/assertion frameworks: a
//! matcher type declares its shape once — fixed and collection arguments,
//! optional modifiers, single and per-element assertions, callbacks and
//! default options — and the engine composes that metadata into predicate
//! objects implementing the full `matches`/description/failure-message
//! protocol, including the positive/negative duality used by
//! `should`/`should_not`-style test glue.
//!
//! # Example
//!
//! ```
//! use matchkit::{AssertionOutcome, CollectionArg, DefinitionBuilder, Value};
//!
//! # fn example() -> matchkit::Result<()> {
//! // Declared once per matcher type.
//! let contain = DefinitionBuilder::<Vec<i64>>::new("contain")
//!     .collection_argument(CollectionArg::new("values").singular("value"))
//!     .single_assertion("has_elements", |eval| Ok(!eval.subject().is_empty()))
//!     .collection_assertion("is_included", |eval| {
//!         let wanted = eval.current().and_then(|v| v.as_integer());
//!         let found = wanted.is_some_and(|v| eval.subject().contains(&v));
//!         Ok(AssertionOutcome::of(found).with_default("include %{value}"))
//!     })
//!     .build()?;
//!
//! // Constructed once per expectation.
//! let mut matcher = contain.construct(vec![Value::from(1i64), Value::from(2i64)])?;
//!
//! assert!(matcher.matches(vec![1, 2, 3])?);
//! assert!(!matcher.matches(vec![4])?);
//! assert_eq!(matcher.failure_message(), "Expected [4] to include 1");
//! # Ok(())
//! # }
//! ```
//!
//! # Message templates
//!
//! Failure and description strings resolve through per-locale catalogs
//! registered in a process-wide store; see [`register_catalog`] and
//! [`set_active_locale`]. Resolution is layered (matcher-scoped key, global
//! key, the assertion's inline default, generated sentence) and total —
//! sparse catalogs degrade to generated sentences, never to errors.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]

// Re-export commonly used items
pub use definition::{
    ArgumentSpec, AssertionOutcome, CollectionArg, DefinitionBuilder, MatcherDefinition,
    MessageContext, OptionalSpec,
};
pub use error::{Error, Result};
pub use matcher::{Evaluation, MatcherInstance, Options};
pub use message::templates::{
    active_locale, register_catalog, set_active_locale, Catalog, Locale,
};
pub use value::{options, Value};

/// Argument, option and context values
pub mod value;

/// Error types
pub mod error;

/// Matcher type definitions and the declaration API
pub mod definition;

/// Matcher instances and the `matches` protocol
pub mod matcher;

/// Message composition and template catalogs
pub mod message;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber with default settings
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_reexports_compose() {
        let def = DefinitionBuilder::<()>::new("present").build().unwrap();
        let matcher = def.construct(vec![]).unwrap();
        assert_eq!(matcher.description(), "present");
    }
}
