use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("unknown filter kind: {0}")]
    UnknownFilterKind(String),
    #[error("response is missing `{0}`")]
    MissingField(&'static str),
}
