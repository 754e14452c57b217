//! Named queries and the registry that resolves command names to them.
//!
//! A [`Query`] turns a [`RecordStore`] into one line of text. [`QueryRegistry::standard`] holds the
//! built-in vocabulary (see [`standard`]); [`QueryRegistry::lookup`] returns `None` for unknown
//! names so callers decide how to report them.
//!
//! ```rust
//! use order_insights::queries::QueryRegistry;
//! use order_insights::types::RecordStore;
//!
//! let registry = QueryRegistry::standard();
//! assert!(registry.lookup("pms").is_some());
//! assert!(registry.lookup("most-ordered-item").is_some());
//! assert!(registry.lookup("nope").is_none());
//!
//! let output = registry.lookup("pms").unwrap().run(&RecordStore::new());
//! assert_eq!(output.message, "No result for 'pms': no matching data.");
//! ```

pub mod standard;
pub mod template;

use std::fmt;

use crate::processing::{aggregate, aggregate_ingredients, AggregateResult, Reduction};
use crate::types::RecordStore;

pub use template::{MessageTemplate, TotalStyle};

/// Output of one [`Query::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutput {
    /// Line to print.
    pub message: String,
    /// Underlying answer, `None` when there was nothing to report.
    pub result: Option<AggregateResult>,
}

impl QueryOutput {
    /// Output for a query that found an answer.
    pub fn answered(message: String, result: AggregateResult) -> Self {
        Self {
            message,
            result: Some(result),
        }
    }

    /// Output for a query with no answer.
    pub fn no_result(name: &str) -> Self {
        Self {
            message: format!("No result for '{name}': no matching data."),
            result: None,
        }
    }
}

/// A named computation over the loaded orders.
pub trait Query: Send + Sync {
    /// Primary command name.
    fn name(&self) -> &str;

    /// Additional names accepted on the command line.
    fn aliases(&self) -> &[&'static str] {
        &[]
    }

    /// One-line description for listings.
    fn description(&self) -> &str;

    /// Run against `records`.
    fn run(&self, records: &RecordStore) -> QueryOutput;
}

/// What an [`AggregateQuery`] groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    /// Whole value of a field.
    Field(&'static str),
    /// Each entry of a comma-separated list field.
    ListEntries(&'static str),
}

/// A query answered by [`aggregate`] or [`aggregate_ingredients`].
#[derive(Debug, Clone)]
pub struct AggregateQuery {
    name: &'static str,
    aliases: Vec<&'static str>,
    description: &'static str,
    grouping: Grouping,
    value_field: &'static str,
    reduction: Reduction,
    template: MessageTemplate,
}

impl AggregateQuery {
    /// Create a query.
    ///
    /// # Panics
    ///
    /// Panics if `template` renders a total but `reduction` is [`Reduction::Average`], which has
    /// no single group total.
    pub fn new(
        name: &'static str,
        grouping: Grouping,
        value_field: &'static str,
        reduction: Reduction,
        template: MessageTemplate,
    ) -> Self {
        assert!(
            !(template.needs_total() && reduction == Reduction::Average),
            "query '{name}': average results have no group total to render"
        );
        Self {
            name,
            aliases: Vec::new(),
            description: "",
            grouping,
            value_field,
            reduction,
            template,
        }
    }

    /// Add an alternative command name.
    pub fn alias(mut self, alias: &'static str) -> Self {
        self.aliases.push(alias);
        self
    }

    /// Set the listing description.
    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Reduction applied by this query.
    pub fn reduction(&self) -> Reduction {
        self.reduction
    }

    /// Grouping used by this query.
    pub fn grouping(&self) -> Grouping {
        self.grouping
    }
}

impl Query for AggregateQuery {
    fn name(&self) -> &str {
        self.name
    }

    fn aliases(&self) -> &[&'static str] {
        &self.aliases
    }

    fn description(&self) -> &str {
        self.description
    }

    fn run(&self, records: &RecordStore) -> QueryOutput {
        let result = match self.grouping {
            Grouping::Field(field) => aggregate(records, field, self.value_field, self.reduction),
            Grouping::ListEntries(field) => {
                aggregate_ingredients(records, field, self.value_field, self.reduction)
            }
        };
        match result {
            Some(result) => QueryOutput::answered(self.template.render(&result), result),
            None => QueryOutput::no_result(self.name),
        }
    }
}

/// Maps command names (and aliases) to [`Query`] implementations.
#[derive(Default)]
pub struct QueryRegistry {
    queries: Vec<Box<dyn Query>>,
}

impl QueryRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in order queries.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for query in standard::queries() {
            registry.register(query);
        }
        registry
    }

    /// Add a query.
    ///
    /// # Panics
    ///
    /// Panics if its name or one of its aliases is already registered.
    pub fn register(&mut self, query: impl Query + 'static) {
        for name in std::iter::once(query.name()).chain(query.aliases().iter().copied()) {
            assert!(self.lookup(name).is_none(), "query name '{name}' registered twice");
        }
        self.queries.push(Box::new(query));
    }

    /// Query registered under `name` (primary name or alias).
    pub fn lookup(&self, name: &str) -> Option<&dyn Query> {
        self.queries
            .iter()
            .find(|q| q.name() == name || q.aliases().contains(&name))
            .map(|q| q.as_ref())
    }

    /// Iterate registered queries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Query> + '_ {
        self.queries.iter().map(|q| q.as_ref())
    }

    /// Primary names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|q| q.name())
    }

    /// Number of registered queries.
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    /// `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

impl fmt::Debug for QueryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryRegistry")
            .field("names", &self.names().collect::<Vec<_>>())
            .finish()
    }
}
