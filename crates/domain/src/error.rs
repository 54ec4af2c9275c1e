#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum CreateError {
    #[error("conflict")]
    Conflict,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum DeleteError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("no connection")]
    NoConnection,
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

/// Failure of a single call to the generation endpoint.
///
/// Never surfaced to the caller of a submission: the record builder recovers
/// from every variant by running the fallback parser.
#[derive(thiserror::Error, Debug)]
pub enum GatewayError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected response shape: {0}")]
    Shape(String),
    #[error("no recognized exercise in generated output")]
    NoRecognizedExercise { best_guess: Option<String> },
}

#[derive(thiserror::Error, Debug)]
pub enum SubmitError {
    #[error("utterance is empty")]
    EmptyInput,
    #[error("{}", unrecognized_message(.best_guess))]
    NoRecognizedExercise { best_guess: Option<String> },
    #[error("failed to save workout: {0}")]
    Persistence(#[from] CreateError),
}

#[allow(clippy::ref_option)]
fn unrecognized_message(best_guess: &Option<String>) -> String {
    match best_guess {
        Some(name) => format!("no such exercise: {name}"),
        None => "no recognizable exercise".to_string(),
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("exercise \"{0}\" already exists")]
    Conflict(String),
}
