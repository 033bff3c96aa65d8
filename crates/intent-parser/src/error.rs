use thiserror::Error;

pub type Result<T, E = ClassifierError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("invalid pattern for {intent}: {source}")]
    Pattern {
        intent: &'static str,
        #[source]
        source: regex::Error,
    },
    #[error("unknown intent: {0}")]
    UnknownIntent(String),
}
