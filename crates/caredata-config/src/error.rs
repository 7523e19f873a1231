use caredata_core::CoreError;

/// Errors raised while loading or converting a module descriptor.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Could not read the descriptor file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The descriptor is not valid TOML.
    #[error("Descriptor parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// The descriptor parsed but produced an invalid model value.
    #[error("Invalid descriptor: {0}")]
    Model(#[from] CoreError),

    /// A lookup declares an unknown return cardinality.
    #[error("Unknown cardinality on lookup {lookup}: {value}")]
    UnknownCardinality {
        /// The lookup with the bad declaration.
        lookup: String,
        /// The unrecognized `returns` value.
        value: String,
    },
}

impl ConfigError {
    /// Creates a new `UnknownCardinality` error.
    #[must_use]
    pub fn unknown_cardinality(lookup: impl Into<String>, value: impl Into<String>) -> Self {
        Self::UnknownCardinality {
            lookup: lookup.into(),
            value: value.into(),
        }
    }
}
