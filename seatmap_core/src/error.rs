#[derive(Debug, thiserror::Error)]
pub enum ParamsError {
    #[error("cell size must be positive")]
    CellSize,

    #[error("seats per slot must be positive")]
    SeatsPerSlot,

    #[error("missing field '{0}'")]
    Missing(&'static str),

    #[error("invalid color '{0}'")]
    Color(String),

    #[error("invalid canvas parameters: {0}")]
    Json(#[from] serde_json::Error),
}
