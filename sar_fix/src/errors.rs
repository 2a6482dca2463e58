use thiserror::Error;

#[derive(Error, Debug)]
pub enum SarFixError {
    #[error("External tool not found: {0}")]
    ToolNotFound(String),

    #[error("Target directory unreadable: {0}")]
    DirectoryUnreadable(String),

    #[error("Operator input channel closed: {0}")]
    OperatorChannelClosed(String),

    #[error("FFprobe failed: {0}")]
    FFprobeError(String),

    #[error("FFmpeg failed: {0}")]
    FFmpegError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SarFixError {
    /// Only setup-class errors abort the run; everything else is recorded as
    /// a per-file outcome and the run continues.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SarFixError::ToolNotFound(_)
                | SarFixError::DirectoryUnreadable(_)
                | SarFixError::OperatorChannelClosed(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SarFixError>;
