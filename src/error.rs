use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Rejected world configuration. Raised before any particle is allocated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("half-extent must be finite and > 0, got {0}")]
    NonPositiveHalfExtent(f64),

    #[error("cutoff radius must be finite and > 0, got {0}")]
    NonPositiveRadius(f64),

    #[error("damping must lie in (0, 1], got {0}")]
    DampingOutOfRange(f64),

    #[error("at least one group is required")]
    NoGroups,

    #[error("group '{0}' has no particles")]
    EmptyGroup(String),

    #[error("group '{0}' is declared more than once")]
    DuplicateGroup(String),

    #[error("rule references unknown group '{0}'")]
    UnknownGroup(String),

    #[error("rule {from}->{to} has non-finite coefficient {coefficient}")]
    NonFiniteCoefficient {
        from: String,
        to: String,
        coefficient: f64,
    },

    #[error("rule {from}->{to} is declared more than once")]
    DuplicateRule { from: String, to: String },

    #[error("layout for group '{group}' has {actual} positions, expected {expected}")]
    LayoutMismatch {
        group: String,
        expected: usize,
        actual: usize,
    },

    #[error("layout position {index} of group '{group}' lies outside [-{half_extent}, {half_extent}]")]
    LayoutOutOfBounds {
        group: String,
        index: usize,
        half_extent: f64,
    },

    #[error("only 2-D and 3-D worlds are supported, got {0}")]
    UnsupportedDimension(usize),
}

/// Top-level error for the simulation and its terminal front end.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
