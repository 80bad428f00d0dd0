use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file: {0}")]
    CatalogFileParse(#[from] serde_yaml::Error),

    #[error("catalog validation failed: {0}")]
    Validation(String),
}

/// Errors from the JSON files that hold admin curation state.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown curated area: {0}")]
    UnknownArea(String),
}

/// Caller contract violations against the bracket engine.
///
/// These indicate a bug in the driving UI, not a runtime condition to
/// recover from.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketError {
    #[error("a bracket needs exactly {expected} seeds, got {actual}")]
    WrongSeedCount { expected: usize, actual: usize },

    #[error("seed {0} appears more than once")]
    DuplicateSeed(String),

    #[error("the bracket is already complete")]
    AlreadyComplete,

    #[error("{winner_id} is not part of the current pairing")]
    NotInCurrentPairing { winner_id: String },

    #[error("bracket state has no winners slot for round {round}")]
    InconsistentState { round: usize },
}
