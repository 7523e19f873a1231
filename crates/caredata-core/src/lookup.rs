use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;
use crate::query_params::QueryParams;

/// How a lookup field is matched against an argument value.
///
/// Multi-field lookups always combine their fields conjunctively (AND);
/// there is no disjunction support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonMode {
    #[default]
    Eq,
}

impl fmt::Display for ComparisonMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq => write!(f, "eq"),
        }
    }
}

/// Return cardinality of a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnCardinality {
    /// Exactly zero or one matching record; more than one is an error.
    Single,
    /// All matching records, optionally paginated.
    List,
    /// The number of matching records, without materializing them.
    Count,
}

impl ReturnCardinality {
    /// Stable discriminant used by the binary class encoding.
    pub const fn discriminant(self) -> u8 {
        match self {
            Self::Single => 0,
            Self::List => 1,
            Self::Count => 2,
        }
    }
}

/// A named, parameterized query pattern declared alongside an entity.
///
/// Field names are validated against the owning entity at enhancement time,
/// not at call time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupDefinition {
    pub name: String,
    /// Ordered (field name, comparison mode) pairs; argument order at call
    /// time follows this order.
    pub fields: Vec<(String, ComparisonMode)>,
    pub cardinality: ReturnCardinality,
    /// Default pagination applied when the caller passes no per-call params.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub default_params: Option<QueryParams>,
}

impl LookupDefinition {
    /// Starts building a lookup with the given name.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> LookupDefinitionBuilder {
        LookupDefinitionBuilder {
            name: name.into(),
            fields: Vec::new(),
            cardinality: ReturnCardinality::List,
            default_params: None,
        }
    }

    /// Number of arguments this lookup expects at call time.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    /// Ordered field names referenced by this lookup.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

/// Builder for `LookupDefinition`.
#[derive(Debug, Clone)]
pub struct LookupDefinitionBuilder {
    name: String,
    fields: Vec<(String, ComparisonMode)>,
    cardinality: ReturnCardinality,
    default_params: Option<QueryParams>,
}

impl LookupDefinitionBuilder {
    /// Adds a field predicate to the lookup.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, mode: ComparisonMode) -> Self {
        self.fields.push((name.into(), mode));
        self
    }

    /// Sets the return cardinality.
    #[must_use]
    pub fn returns(mut self, cardinality: ReturnCardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    /// Sets default pagination parameters.
    #[must_use]
    pub fn default_params(mut self, params: QueryParams) -> Self {
        self.default_params = Some(params);
        self
    }

    /// Validates local invariants and builds the lookup definition.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidLookupName` for an empty name and
    /// `CoreError::EmptyLookup` for a lookup with no fields.
    pub fn build(self) -> Result<LookupDefinition, CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::invalid_lookup_name(self.name));
        }
        if self.fields.is_empty() {
            return Err(CoreError::EmptyLookup { lookup: self.name });
        }
        Ok(LookupDefinition {
            name: self.name,
            fields: self.fields,
            cardinality: self.cardinality,
            default_params: self.default_params,
        })
    }
}
