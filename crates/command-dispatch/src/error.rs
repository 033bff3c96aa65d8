use intent_parser::ClassifierError;
use thiserror::Error;

pub type Result<T, E = DispatchError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("classifier: {0}")]
    Classifier(#[from] ClassifierError),
    #[error("invalid session config: {0}")]
    Config(String),
}
