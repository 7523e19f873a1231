//! Lookup registration and query service for the CareData platform.
//!
//! Declarative lookup definitions are compiled once into executable
//! [`QueryOperation`]s: compilation validates field references and captures
//! expected argument types, execution validates arity and types before any
//! store access and dispatches on the lookup's return cardinality
//! (single / list / count).
//!
//! [`EntityDataService`] bundles an entity's compiled lookup set behind an
//! atomic pointer swap, so redefining an entity while queries are in flight
//! lets each query run entirely against the schema version it loaded,
//! never a mix.

pub mod error;
pub mod operation;
pub mod service;

pub use error::{LookupError, QueryError};
pub use operation::{QueryOperation, QueryOutcome, compile};
pub use service::EntityDataService;
