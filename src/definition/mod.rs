//! Matcher type definitions
//!
//! A [`MatcherDefinition`] is the per-type descriptor: the declared argument
//! shape, optional modifiers, assertion lists, callbacks and default options
//! of one kind of matcher. Definitions are declared once through a
//! [`DefinitionBuilder`], validated eagerly, and shared immutably (`Arc`)
//! by every instance constructed from them.
//!
//! # Example
//!
//! ```
//! use matchkit::{AssertionOutcome, CollectionArg, DefinitionBuilder, Value};
//!
//! # fn example() -> matchkit::Result<()> {
//! let contain = DefinitionBuilder::<Vec<i64>>::new("contain")
//!     .collection_argument(CollectionArg::new("values").singular("value"))
//!     .collection_assertion("is_included", |eval| {
//!         let wanted = eval.current().and_then(|v| v.as_integer());
//!         let found = wanted.is_some_and(|v| eval.subject().contains(&v));
//!         Ok(AssertionOutcome::of(found).with_default("include %{value}"))
//!     })
//!     .build()?;
//!
//! let mut matcher = contain.construct(vec![Value::from(1i64)])?;
//! assert!(matcher.matches(vec![1, 2])?);
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use crate::matcher::{Evaluation, MatcherInstance};
use crate::value::Value;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

pub mod arguments;
pub mod assertions;
pub mod optionals;

pub use arguments::{ArgumentSpec, CollectionArg};
pub use assertions::{AssertionFn, AssertionOutcome, BlockFn, HookFn, MessageContext};
pub use optionals::OptionalSpec;

/// Names accepted for matchers, namespaces, arguments and optionals
static IDENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("invalid identifier regex"));

/// Assertion names additionally allow a trailing predicate mark
static ASSERTION_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*[?!]?$").expect("invalid assertion regex"));

/// Default options of a matcher type: absent, a static mapping, or computed
#[derive(Clone, Default)]
pub enum DefaultOptions {
    /// No defaults declared
    #[default]
    None,
    /// Static mapping merged under explicit options
    Static(BTreeMap<String, Value>),
    /// Callback producing the mapping at construction time
    Computed(Arc<dyn Fn() -> BTreeMap<String, Value> + Send + Sync>),
}

impl DefaultOptions {
    pub(crate) fn resolve(&self) -> BTreeMap<String, Value> {
        match self {
            DefaultOptions::None => BTreeMap::new(),
            DefaultOptions::Static(map) => map.clone(),
            DefaultOptions::Computed(f) => f(),
        }
    }
}

impl fmt::Debug for DefaultOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultOptions::None => write!(f, "None"),
            DefaultOptions::Static(map) => f.debug_tuple("Static").field(map).finish(),
            DefaultOptions::Computed(_) => write!(f, "Computed(..)"),
        }
    }
}

/// A declared callback: a named entry in the hook table or an inline body
pub(crate) struct Hook<S> {
    pub(crate) name: String,
    pub(crate) body: Option<HookFn<S>>,
}

impl<S> Clone for Hook<S> {
    fn clone(&self) -> Self {
        Hook {
            name: self.name.clone(),
            body: self.body.clone(),
        }
    }
}

impl<S> fmt::Debug for Hook<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook")
            .field("name", &self.name)
            .field("inline", &self.body.is_some())
            .finish()
    }
}

/// Declaration-time shape of one matcher type, shared by every instance
struct DefinitionInner<S> {
    name: String,
    namespace: Option<String>,
    arguments: ArgumentSpec,
    optionals: Vec<OptionalSpec>,
    single_assertions: Vec<String>,
    collection_assertions: Vec<String>,
    methods: HashMap<String, AssertionFn<S>>,
    after_initialize: Vec<Hook<S>>,
    before_assert: Vec<Hook<S>>,
    hook_methods: HashMap<String, HookFn<S>>,
    default_options: DefaultOptions,
}

/// Per-matcher-type descriptor built by [`DefinitionBuilder`]
///
/// Immutable once built and cheap to clone: clones share the underlying
/// descriptor, so one definition can construct any number of instances.
pub struct MatcherDefinition<S> {
    inner: Arc<DefinitionInner<S>>,
}

impl<S> Clone for MatcherDefinition<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> fmt::Debug for MatcherDefinition<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatcherDefinition")
            .field("name", &self.inner.name)
            .field("namespace", &self.inner.namespace)
            .field("arguments", &self.inner.arguments)
            .field("optionals", &self.inner.optionals)
            .field("single_assertions", &self.inner.single_assertions)
            .field("collection_assertions", &self.inner.collection_assertions)
            .finish()
    }
}

impl<S> MatcherDefinition<S> {
    /// The matcher type name as declared
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The declared argument shape
    pub fn arguments(&self) -> &ArgumentSpec {
        &self.inner.arguments
    }

    /// Declared optionals, in declaration order
    pub fn optionals(&self) -> &[OptionalSpec] {
        &self.inner.optionals
    }

    /// Single assertion names, in declaration order
    pub fn single_assertions(&self) -> &[String] {
        &self.inner.single_assertions
    }

    /// Collection assertion names, in declaration order
    pub fn collection_assertions(&self) -> &[String] {
        &self.inner.collection_assertions
    }

    /// Message scope key derived from the namespace and type name
    ///
    /// Snake-cased, with any trailing `matcher` suffix stripped:
    /// `ContainMatcher` in namespace `enumerable` scopes to
    /// `enumerable.contain`.
    pub fn scope_key(&self) -> String {
        let mut base = snake_case(&self.inner.name);
        if let Some(stripped) = base.strip_suffix("_matcher") {
            base = stripped.to_string();
        }
        match &self.inner.namespace {
            Some(ns) => format!("{}.{}", ns, base),
            None => base,
        }
    }

    pub(crate) fn default_options(&self) -> &DefaultOptions {
        &self.inner.default_options
    }

    pub(crate) fn after_initialize_hooks(&self) -> &[Hook<S>] {
        &self.inner.after_initialize
    }

    pub(crate) fn before_assert_hooks(&self) -> &[Hook<S>] {
        &self.inner.before_assert
    }

    pub(crate) fn assertion_body(&self, name: &str) -> Result<AssertionFn<S>> {
        self.inner
            .methods
            .get(name)
            .cloned()
            .ok_or_else(|| Error::unbound_assertion(&self.inner.name, name))
    }

    pub(crate) fn hook_body(&self, hook: &Hook<S>) -> Result<HookFn<S>> {
        if let Some(body) = &hook.body {
            return Ok(Arc::clone(body));
        }
        self.inner
            .hook_methods
            .get(&hook.name)
            .cloned()
            .ok_or_else(|| Error::UnboundHook {
                matcher: self.inner.name.clone(),
                name: hook.name.clone(),
            })
    }

    /// Construct an instance from actual arguments
    ///
    /// Fixed positionals bind in declared order; remaining positionals fill
    /// the collection; a single trailing mapping actual is diverted to the
    /// explicit options instead.
    pub fn construct(&self, args: Vec<Value>) -> Result<MatcherInstance<S>> {
        crate::matcher::builder::construct(self, args, None)
    }

    /// Construct an instance, supplying a construction block
    ///
    /// The block is stored under the declared block parameter name; with no
    /// declared name it is dropped.
    pub fn construct_with_block(
        &self,
        args: Vec<Value>,
        block: BlockFn<S>,
    ) -> Result<MatcherInstance<S>> {
        crate::matcher::builder::construct(self, args, Some(block))
    }
}

/// Builder for [`MatcherDefinition`], the declaration-time API
///
/// Declaration calls chain; validation failures are reported by
/// [`build`](DefinitionBuilder::build), which fails fast on the first
/// violated declaration rule.
pub struct DefinitionBuilder<S> {
    name: String,
    namespace: Option<String>,
    arguments: ArgumentSpec,
    collection_declared_here: bool,
    optionals: Vec<OptionalSpec>,
    single_assertions: Vec<String>,
    collection_assertions: Vec<String>,
    methods: HashMap<String, AssertionFn<S>>,
    after_initialize: Vec<Hook<S>>,
    before_assert: Vec<Hook<S>>,
    hook_methods: HashMap<String, HookFn<S>>,
    default_options: DefaultOptions,
    error: Option<Error>,
}

impl<S> DefinitionBuilder<S> {
    /// Start declaring a new matcher type
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            arguments: ArgumentSpec::default(),
            collection_declared_here: false,
            optionals: Vec::new(),
            single_assertions: Vec::new(),
            collection_assertions: Vec::new(),
            methods: HashMap::new(),
            after_initialize: Vec::new(),
            before_assert: Vec::new(),
            hook_methods: HashMap::new(),
            default_options: DefaultOptions::None,
            error: None,
        }
    }

    /// Start declaring a subtype of an existing definition
    ///
    /// The parent's argument and optional specs, assertion lists, method
    /// tables and hooks are inherited; subsequent declarations append and
    /// never destructively overwrite them. A subtype may declare its own
    /// collection argument, replacing the inherited one.
    pub fn extending(name: impl Into<String>, parent: &MatcherDefinition<S>) -> Self {
        let parent = &parent.inner;
        Self {
            name: name.into(),
            namespace: parent.namespace.clone(),
            arguments: parent.arguments.clone(),
            collection_declared_here: false,
            optionals: parent.optionals.clone(),
            single_assertions: parent.single_assertions.clone(),
            collection_assertions: parent.collection_assertions.clone(),
            methods: parent.methods.clone(),
            after_initialize: parent.after_initialize.clone(),
            before_assert: parent.before_assert.clone(),
            hook_methods: parent.hook_methods.clone(),
            default_options: parent.default_options.clone(),
            error: None,
        }
    }

    /// Set the dotted namespace used in message scope keys
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Declare fixed positional arguments, in binding order
    pub fn fixed_arguments<I, N>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        for name in names {
            let name = name.into();
            if self.error.is_none() && !IDENT_RE.is_match(&name) {
                self.error = Some(Error::invalid_name(&self.name, &name));
            }
            self.arguments.fixed.push(name);
        }
        self
    }

    /// Declare the collection argument
    ///
    /// At most one per definition; a second declaration within the same
    /// builder is a definition error. The singular name must be explicit or
    /// resolvable from the plural dictionary.
    pub fn collection_argument(mut self, collection: CollectionArg) -> Self {
        if self.collection_declared_here {
            if self.error.is_none() {
                let existing = self
                    .arguments
                    .collection
                    .as_ref()
                    .map(|c| c.name.clone())
                    .unwrap_or_default();
                self.error = Some(Error::CollectionRedeclared {
                    matcher: self.name.clone(),
                    existing,
                });
            }
            return self;
        }

        if self.error.is_none() {
            if !IDENT_RE.is_match(&collection.name) {
                self.error = Some(Error::invalid_name(&self.name, &collection.name));
            } else if collection.singular.is_none()
                && arguments::dictionary_singular(&collection.name).is_none()
            {
                self.error = Some(Error::missing_singular_name(&self.name, &collection.name));
            }
        }

        let mut collection = collection;
        if collection.singular.is_none() {
            collection.singular =
                arguments::dictionary_singular(&collection.name).map(str::to_string);
        }
        self.arguments.collection = Some(collection);
        self.collection_declared_here = true;
        self
    }

    /// Declare an optional modifier
    ///
    /// Re-declaring an already-known name is a no-op, so shared assertion
    /// mixins can declare the same optional from both sides of a diamond.
    pub fn optional(mut self, spec: OptionalSpec) -> Self {
        if self.optionals.iter().any(|known| known.name == spec.name) {
            return self;
        }

        if self.error.is_none() {
            let shadowed = self
                .optionals
                .iter()
                .find(|known| known.alias.as_deref() == Some(spec.name.as_str()));
            if !IDENT_RE.is_match(&spec.name) {
                self.error = Some(Error::invalid_name(&self.name, &spec.name));
            } else if let Some(existing) = shadowed {
                self.error = Some(Error::AliasConflict {
                    matcher: self.name.clone(),
                    alias: spec.name.clone(),
                    existing: existing.name.clone(),
                });
            } else if let Some(alias) = &spec.alias {
                let taken = self
                    .optionals
                    .iter()
                    .find(|known| known.name == *alias || known.alias.as_deref() == Some(alias));
                if let Some(existing) = taken {
                    self.error = Some(Error::AliasConflict {
                        matcher: self.name.clone(),
                        alias: alias.clone(),
                        existing: existing.name.clone(),
                    });
                }
            }
        }

        self.optionals.push(spec);
        self
    }

    /// Declare a single assertion with an inline body
    pub fn single_assertion<F, R>(mut self, name: impl Into<String>, body: F) -> Self
    where
        F: for<'e> Fn(&mut Evaluation<'e, S>) -> anyhow::Result<R> + Send + Sync + 'static,
        R: Into<AssertionOutcome>,
    {
        let name = name.into();
        self = self.implement(name.clone(), body);
        self.single_assertions.push(name);
        self
    }

    /// Declare a single assertion by name only, to be implemented separately
    pub fn declare_single_assertion(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.check_assertion_name(&name);
        self.single_assertions.push(name);
        self
    }

    /// Declare a collection assertion with an inline body
    pub fn collection_assertion<F, R>(mut self, name: impl Into<String>, body: F) -> Self
    where
        F: for<'e> Fn(&mut Evaluation<'e, S>) -> anyhow::Result<R> + Send + Sync + 'static,
        R: Into<AssertionOutcome>,
    {
        let name = name.into();
        self = self.implement(name.clone(), body);
        self.collection_assertions.push(name);
        self
    }

    /// Declare a collection assertion by name only
    pub fn declare_collection_assertion(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.check_assertion_name(&name);
        self.collection_assertions.push(name);
        self
    }

    /// Install an assertion body without appending to either list
    ///
    /// Pairs with the `declare_*` forms, and lets shared helpers install
    /// bodies for names declared elsewhere.
    pub fn implement<F, R>(mut self, name: impl Into<String>, body: F) -> Self
    where
        F: for<'e> Fn(&mut Evaluation<'e, S>) -> anyhow::Result<R> + Send + Sync + 'static,
        R: Into<AssertionOutcome>,
    {
        let name = name.into();
        self.check_assertion_name(&name);
        let wrapped: AssertionFn<S> = Arc::new(move |eval| body(eval).map(Into::into));
        self.methods.insert(name, wrapped);
        self
    }

    /// Declare the static default options mapping
    pub fn default_options<I, K>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        self.default_options = DefaultOptions::Static(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        );
        self
    }

    /// Declare default options computed by a callback at construction time
    pub fn default_options_with<F>(mut self, f: F) -> Self
    where
        F: Fn() -> BTreeMap<String, Value> + Send + Sync + 'static,
    {
        self.default_options = DefaultOptions::Computed(Arc::new(f));
        self
    }

    /// Append an inline after-initialize hook
    pub fn after_initialize<F>(mut self, body: F) -> Self
    where
        F: Fn(&mut MatcherInstance<S>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let label = format!("after_initialize#{}", self.after_initialize.len());
        self.after_initialize.push(Hook {
            name: label,
            body: Some(Arc::new(body)),
        });
        self
    }

    /// Append a named after-initialize hook, resolved from the hook table
    pub fn after_initialize_named(mut self, name: impl Into<String>) -> Self {
        self.after_initialize.push(Hook {
            name: name.into(),
            body: None,
        });
        self
    }

    /// Append an inline before-assert hook
    pub fn before_assert<F>(mut self, body: F) -> Self
    where
        F: Fn(&mut MatcherInstance<S>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let label = format!("before_assert#{}", self.before_assert.len());
        self.before_assert.push(Hook {
            name: label,
            body: Some(Arc::new(body)),
        });
        self
    }

    /// Append a named before-assert hook, resolved from the hook table
    pub fn before_assert_named(mut self, name: impl Into<String>) -> Self {
        self.before_assert.push(Hook {
            name: name.into(),
            body: None,
        });
        self
    }

    /// Install a named hook body in the hook table
    pub fn implement_hook<F>(mut self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut MatcherInstance<S>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.hook_methods.insert(name.into(), Arc::new(body));
        self
    }

    /// Validate and freeze the definition
    pub fn build(self) -> Result<MatcherDefinition<S>> {
        if let Some(error) = self.error {
            return Err(error);
        }

        if !IDENT_RE.is_match(&self.name) {
            return Err(Error::invalid_name(&self.name, &self.name));
        }
        if let Some(ns) = &self.namespace {
            for segment in ns.split('.') {
                if !IDENT_RE.is_match(segment) {
                    return Err(Error::invalid_name(&self.name, ns));
                }
            }
        }

        debug!(
            matcher = %self.name,
            fixed = self.arguments.fixed.len(),
            collection = self.arguments.collection.as_ref().map(|c| c.name.as_str()),
            optionals = self.optionals.len(),
            "matcher type defined"
        );

        Ok(MatcherDefinition {
            inner: Arc::new(DefinitionInner {
                name: self.name,
                namespace: self.namespace,
                arguments: self.arguments,
                optionals: self.optionals,
                single_assertions: self.single_assertions,
                collection_assertions: self.collection_assertions,
                methods: self.methods,
                after_initialize: self.after_initialize,
                before_assert: self.before_assert,
                hook_methods: self.hook_methods,
                default_options: self.default_options,
            }),
        })
    }

    fn check_assertion_name(&mut self, name: &str) {
        if self.error.is_none() && !ASSERTION_NAME_RE.is_match(name) {
            self.error = Some(Error::invalid_name(&self.name, name));
        }
    }
}

/// Convert a CamelCase or mixed name to snake_case
pub(crate) fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for ch in name.chars() {
        if ch.is_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
            prev_lower = false;
        } else {
            out.push(ch);
            prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        }
    }
    out
}
