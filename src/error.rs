use thiserror::Error;

/// Failure while loading or applying a circuit configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON config '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown gate type: {0}")]
    UnknownGateType(String),

    #[error("unknown component: {0}")]
    UnknownComponent(String),

    #[error("component '{component}' has no pin named '{pin}'")]
    UnknownPin { component: String, pin: String },

    #[error("component name '{0}' is reserved or already used")]
    DuplicateComponent(String),

    #[error("sensor channel '{0}' is wired but the level has no sensor")]
    MissingSensor(String),
}
