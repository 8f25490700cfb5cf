use sidechat_common::UnknownLanguage;

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("The model's response was blocked.")]
    BlockedResponse,
    #[error("The model did not provide a text response.")]
    EmptyTextResponse,
    /// `reason` is the canonical status text or a truncated body.
    #[error("HTTP {status}: {reason}")]
    Transport { status: u16, reason: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("A response is already in progress")]
    Busy,
    #[error("Invalid image attachment: {0}")]
    InvalidImage(String),
    #[error(transparent)]
    UnsupportedLanguage(#[from] UnknownLanguage),
}

impl AiError {
    /// The single message shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            AiError::BlockedResponse
            | AiError::EmptyTextResponse
            | AiError::InvalidImage(_)
            | AiError::UnsupportedLanguage(_) => self.to_string(),
            other => format!("An unhandled error occurred: {other}"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("history io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("history serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("turn has no parts")]
    EmptyTurn,
    #[error("history watch error: {0}")]
    Watch(String),
}
