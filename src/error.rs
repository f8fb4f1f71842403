//! Error types for the matcher engine
//!
//! Errors fall into three groups mirroring the engine's lifecycle:
//! definition-time errors raised while a matcher type is being declared,
//! construction-time errors raised when a constructing call binds actual
//! arguments, and evaluation-time errors raised while `matches` runs.
//! Message-template resolution never errors; composition is total.

use thiserror::Error;

/// Convenience result alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type covering definition, construction and evaluation failures
#[derive(Debug, Error)]
pub enum Error {
    /// Matcher, argument or optional name is not a valid identifier
    #[error("matcher '{matcher}': '{name}' is not a valid identifier")]
    InvalidName {
        /// Matcher type being declared
        matcher: String,
        /// The offending name
        name: String,
    },

    /// Collection argument declared without a resolvable singular name
    #[error("matcher '{matcher}': no singular form known for collection argument '{collection}'; declare one explicitly")]
    MissingSingularName {
        /// Matcher type being declared
        matcher: String,
        /// Collection argument name
        collection: String,
    },

    /// Collection argument declared twice within one definition
    #[error("matcher '{matcher}': collection argument already declared as '{existing}'")]
    CollectionRedeclared {
        /// Matcher type being declared
        matcher: String,
        /// Previously declared collection name
        existing: String,
    },

    /// Optional alias already bound to a different optional
    #[error("matcher '{matcher}': alias '{alias}' is already bound to optional '{existing}'")]
    AliasConflict {
        /// Matcher type being declared
        matcher: String,
        /// The conflicting alias
        alias: String,
        /// Optional the alias is already bound to
        existing: String,
    },

    /// Constructing call supplied fewer actuals than declared fixed arguments
    #[error("matcher '{matcher}' expects at least {expected} arguments, got {got}")]
    TooFewArguments {
        /// Matcher type being constructed
        matcher: String,
        /// Number of declared fixed arguments
        expected: usize,
        /// Number of actuals supplied
        got: usize,
    },

    /// Constructing call supplied extra actuals with no collection declared
    #[error("matcher '{matcher}' expects {expected} arguments, got {got}")]
    TooManyArguments {
        /// Matcher type being constructed
        matcher: String,
        /// Number of declared fixed arguments
        expected: usize,
        /// Number of actuals supplied
        got: usize,
    },

    /// Option name was never declared for this matcher type
    #[error("matcher '{matcher}' has no optional named '{name}'")]
    UnknownOption {
        /// Matcher type being configured
        matcher: String,
        /// The undeclared option name
        name: String,
    },

    /// Declared assertion name resolves to no implementation
    #[error("matcher '{matcher}': assertion '{name}' has no implementation")]
    UnboundAssertion {
        /// Matcher type being evaluated
        matcher: String,
        /// The unimplemented assertion name
        name: String,
    },

    /// Declared hook name resolves to no implementation
    #[error("matcher '{matcher}': hook '{name}' has no implementation")]
    UnboundHook {
        /// Matcher type being evaluated
        matcher: String,
        /// The unimplemented hook name
        name: String,
    },

    /// Assertion body returned an error while running
    #[error("matcher '{matcher}': assertion '{name}' failed to run: {source}")]
    AssertionBody {
        /// Matcher type being evaluated
        matcher: String,
        /// The failing assertion name
        name: String,
        /// Underlying error from the assertion body
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Hook body returned an error while running
    #[error("matcher '{matcher}': hook '{name}' failed to run: {source}")]
    HookBody {
        /// Matcher type being evaluated
        matcher: String,
        /// The failing hook name
        name: String,
        /// Underlying error from the hook body
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Evaluation was attempted without a bound subject
    #[error("matcher '{matcher}': no subject bound")]
    SubjectNotBound {
        /// Matcher type being evaluated
        matcher: String,
    },
}

impl Error {
    /// Create an invalid name error
    pub fn invalid_name(matcher: impl Into<String>, name: impl Into<String>) -> Self {
        Self::InvalidName {
            matcher: matcher.into(),
            name: name.into(),
        }
    }

    /// Create a missing singular name error
    pub fn missing_singular_name(
        matcher: impl Into<String>,
        collection: impl Into<String>,
    ) -> Self {
        Self::MissingSingularName {
            matcher: matcher.into(),
            collection: collection.into(),
        }
    }

    /// Create an unknown option error
    pub fn unknown_option(matcher: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnknownOption {
            matcher: matcher.into(),
            name: name.into(),
        }
    }

    /// Create an unbound assertion error
    pub fn unbound_assertion(matcher: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnboundAssertion {
            matcher: matcher.into(),
            name: name.into(),
        }
    }

    /// Create an assertion body error
    pub fn assertion_body(
        matcher: impl Into<String>,
        name: impl Into<String>,
        source: anyhow::Error,
    ) -> Self {
        Self::AssertionBody {
            matcher: matcher.into(),
            name: name.into(),
            source: source.into(),
        }
    }

    /// Create a hook body error
    pub fn hook_body(
        matcher: impl Into<String>,
        name: impl Into<String>,
        source: anyhow::Error,
    ) -> Self {
        Self::HookBody {
            matcher: matcher.into(),
            name: name.into(),
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_matcher() {
        let err = Error::missing_singular_name("contain", "values");
        assert!(err.to_string().contains("contain"));
        assert!(err.to_string().contains("values"));

        let err = Error::TooFewArguments {
            matcher: "validate_length_of".to_string(),
            expected: 1,
            got: 0,
        };
        assert!(err.to_string().contains("at least 1"));
    }

    #[test]
    fn test_assertion_body_preserves_source() {
        let err = Error::assertion_body("contain", "is_included", anyhow::anyhow!("boom"));
        assert!(err.to_string().contains("is_included"));
        assert!(err.to_string().contains("boom"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
