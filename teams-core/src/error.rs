use thiserror::Error;

#[derive(Error, Debug)]
pub enum TeamsError {
    #[error("Send error: {0}")]
    Send(String),

    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),

    #[error("Payload error: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Channel data missing from activity")]
    MissingChannelData,

    #[error("Channel data is missing the team property")]
    MissingTeam,

    #[error("Mentioned entity and entity id cannot be empty")]
    InvalidMention,

    #[error("Either mentioned name or mention text must have a value")]
    MissingMentionName,

    #[error("Unauthorized tenant: {0}")]
    Unauthorized(String),

    #[error("State error: {0}")]
    State(String),
}

pub type Result<T> = std::result::Result<T, TeamsError>;
