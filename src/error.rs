use std::path::PathBuf;

/// Errors raised while loading assets and building scenes
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("not found: {0}")]
    NotFound(PathBuf),

    #[error("unreadable asset {path}: {reason}")]
    UnreadableAsset { path: PathBuf, reason: String },

    #[error("unsupported asset type: {0}")]
    UnsupportedAsset(PathBuf),

    #[error("{path} repeats the label '{label}'")]
    DuplicateLabel { label: String, path: PathBuf },

    #[error("layout error: {0}")]
    Layout(String),

    #[error("unknown scene '{0}'")]
    UnknownScene(String),

    #[error("unknown object #{0}")]
    UnknownObject(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SceneError {
    pub fn unreadable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        SceneError::UnreadableAsset {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn layout(message: impl Into<String>) -> Self {
        SceneError::Layout(message.into())
    }
}

pub type SceneResult<T> = Result<T, SceneError>;
