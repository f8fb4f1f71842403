//! Argument shape declarations
//!
//! A matcher type declares an ordered list of fixed positional arguments and
//! at most one collection argument: the plural argument the matcher iterates,
//! with a singular alias bound to each element during collection assertions.

/// Fixed and collection argument shape of a matcher type
#[derive(Debug, Clone, Default)]
pub struct ArgumentSpec {
    pub(crate) fixed: Vec<String>,
    pub(crate) collection: Option<CollectionArg>,
}

impl ArgumentSpec {
    /// Declared fixed argument names, in order
    pub fn fixed(&self) -> &[String] {
        &self.fixed
    }

    /// Declared collection argument, if any
    pub fn collection(&self) -> Option<&CollectionArg> {
        self.collection.as_ref()
    }
}

/// Declaration of the collection argument
///
/// The singular name is resolved at definition time: an explicit
/// [`singular`](CollectionArg::singular) always wins, otherwise a fixed
/// dictionary of common plurals is consulted. There is no suffix-guessing;
/// an unresolvable singular is a definition-time error.
#[derive(Debug, Clone)]
pub struct CollectionArg {
    pub(crate) name: String,
    pub(crate) singular: Option<String>,
    pub(crate) block_param: Option<String>,
}

impl CollectionArg {
    /// Declare a collection argument with the given plural name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            singular: None,
            block_param: None,
        }
    }

    /// Set the singular name bound to each element during iteration
    pub fn singular(mut self, name: impl Into<String>) -> Self {
        self.singular = Some(name.into());
        self
    }

    /// Set the name a construction block is stored under
    pub fn block_param(mut self, name: impl Into<String>) -> Self {
        self.block_param = Some(name.into());
        self
    }

    /// The plural collection name
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Dictionary-only singular lookup for common plural argument names
///
/// Deliberately not a general inflector: correctness never depends on
/// guessing, and anything outside this table must be declared explicitly.
pub(crate) fn dictionary_singular(plural: &str) -> Option<&'static str> {
    match plural {
        "attributes" => Some("attribute"),
        "values" => Some("value"),
        "keys" => Some("key"),
        "names" => Some("name"),
        "messages" => Some("message"),
        "properties" => Some("property"),
        "columns" => Some("column"),
        "fields" => Some("field"),
        "methods" => Some("method"),
        "associations" => Some("association"),
        _ => None,
    }
}
