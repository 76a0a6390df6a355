use crate::slot::ModelStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecognizerError {
    /// Classification was requested before the model reached `Ready`.
    #[error("model is not ready to classify (status: {status})")]
    NotReady { status: ModelStatus },
    #[error("model slot has already been initialized")]
    AlreadyInitialized,
    #[error(transparent)]
    Model(#[from] anyhow::Error),
}

pub type RecognizerResult<T> = Result<T, RecognizerError>;
