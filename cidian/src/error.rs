use cidian_core::StoreError;

/// Errors returned by `Engine::lookup`.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// The request was rejected before classification.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A store call failed; the lookup is not retried.
    #[error("lexicon store unavailable: {source}")]
    StoreUnavailable {
        #[from]
        source: StoreError,
    },
}
