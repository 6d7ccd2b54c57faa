use thiserror::Error;

/// Source errors are boxed so this crate stays free of driver dependencies;
/// the Bolt client lives in `loregraph-core`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum Error {
    /// Store unreachable or credentials rejected at session acquisition.
    /// Never retried here; surfaced to the caller immediately.
    #[error("failed to connect to graph store at {uri}")]
    Connection {
        uri: String,
        #[source]
        source: BoxError,
    },

    /// Malformed statement, parameter mismatch, or store-side runtime
    /// failure. An empty result set is not an error.
    #[error("graph query execution failed")]
    Execution(#[source] BoxError),

    #[error("invalid configuration")]
    Config(#[from] config::ConfigError),
}

impl Error {
    pub fn connection(uri: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Error::Connection {
            uri: uri.into(),
            source: source.into(),
        }
    }

    pub fn execution(source: impl Into<BoxError>) -> Self {
        Error::Execution(source.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
