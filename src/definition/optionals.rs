//! Optional-modifier declarations
//!
//! Each declared optional becomes a fluent configuration slot on matcher
//! instances: call-style (`with`/`set`) and flag-style (`enable`) writes all
//! land in the same `options` entry. An optional may carry a default value
//! used by flag-style calls and a single alias forwarding to the same slot.

use crate::value::Value;

/// Declaration of one optional modifier
#[derive(Debug, Clone)]
pub struct OptionalSpec {
    pub(crate) name: String,
    pub(crate) default: Option<Value>,
    pub(crate) alias: Option<String>,
}

impl OptionalSpec {
    /// Declare an optional with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
            alias: None,
        }
    }

    /// Set the value stored by a flag-style call with no argument
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Register an alias name forwarding to the same storage slot
    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.alias = Some(name.into());
        self
    }

    /// The canonical optional name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared default value, if any
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// Resolve a call name (canonical or alias) to the canonical optional
pub(crate) fn resolve_optional<'a>(
    optionals: &'a [OptionalSpec],
    name: &str,
) -> Option<&'a OptionalSpec> {
    optionals
        .iter()
        .find(|spec| spec.name == name || spec.alias.as_deref() == Some(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_spec_builder() {
        let spec = OptionalSpec::new("allow_nil")
            .default_value(true)
            .alias("allows_nil");

        assert_eq!(spec.name(), "allow_nil");
        assert_eq!(spec.default(), Some(&Value::Bool(true)));
        assert_eq!(spec.alias.as_deref(), Some("allows_nil"));
    }

    #[test]
    fn test_resolution_by_name_and_alias() {
        let optionals = vec![
            OptionalSpec::new("allow_nil").alias("allows_nil"),
            OptionalSpec::new("within"),
        ];

        assert_eq!(resolve_optional(&optionals, "allow_nil").unwrap().name(), "allow_nil");
        assert_eq!(resolve_optional(&optionals, "allows_nil").unwrap().name(), "allow_nil");
        assert_eq!(resolve_optional(&optionals, "within").unwrap().name(), "within");
        assert!(resolve_optional(&optionals, "with_message").is_none());
    }
}
