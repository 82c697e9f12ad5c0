use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error(transparent)]
    Genai(#[from] genai::Error),
    #[error("model error: {0}")]
    Model(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session not found: app={app_name} user={user_id} session={session_id}")]
    NotFound {
        app_name: String,
        user_id: String,
        session_id: String,
    },
    #[error("session already exists: {0}")]
    AlreadyExists(String),
}

/// Failure while producing the event stream of one invocation.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("max iterations reached ({0})")]
    MaxIterations(usize),
}
