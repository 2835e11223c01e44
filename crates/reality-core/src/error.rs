use thiserror::Error;

#[derive(Debug, Error)]
pub enum RealityError {
    #[error("no checkers registered: register at least one source checker before running")]
    NoCheckersRegistered,

    #[error("trust hierarchy is empty: conflict resolution requires an explicit source ranking")]
    EmptyTrustHierarchy,

    #[error("invalid mode '{0}': expected emergency, quick, or full")]
    InvalidMode(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, RealityError>;
