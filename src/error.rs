use thiserror::Error;

/// Main error type for the garden-stylizer library
#[derive(Error, Debug)]
pub enum StylizerError {
    #[error("Image load error: {0}")]
    Load(#[from] ImageLoadError),

    #[error("Processing error: {0}")]
    Processing(#[from] ProcessingError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Image store error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// The source image could not be read, fetched or decoded
#[derive(Error, Debug)]
pub enum ImageLoadError {
    #[error("Failed to read image: {source_name} - {reason}")]
    ReadFailed { source_name: String, reason: String },

    #[error("Failed to fetch image: {url} - {reason}")]
    FetchFailed { url: String, reason: String },

    #[error("Invalid base64 image data: {reason}")]
    InvalidBase64 { reason: String },

    #[error("Failed to decode image: {source_name} - {reason}")]
    DecodeFailed { source_name: String, reason: String },
}

/// Failures inside the filter, edge and blur stages or while encoding
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("Pixel buffer has {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("Image dimensions differ: {left:?} vs {right:?}")]
    DimensionMismatch { left: (u32, u32), right: (u32, u32) },

    #[error("Encoding failed: {reason}")]
    EncodingFailed { reason: String },

    #[error("Pipeline stage '{stage}' failed: {reason}")]
    StageFailed { stage: String, reason: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Pod image store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid pod id: {pod_id}")]
    InvalidPodId { pod_id: String },

    #[error("Store operation failed: {operation} - {reason}")]
    OperationFailed { operation: String, reason: String },
}

/// Convenience type alias for Results using StylizerError
pub type Result<T> = std::result::Result<T, StylizerError>;

impl StylizerError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Check if this error is recoverable (can be retried)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(_) => true,
            // Remote hosts come and go
            Self::Load(ImageLoadError::FetchFailed { .. }) => true,
            _ => false,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Load(ImageLoadError::ReadFailed { source_name, .. }) => {
                format!("Could not read image '{}'. Please check the file exists.", source_name)
            }
            Self::Load(ImageLoadError::DecodeFailed { source_name, .. }) => {
                format!("Image '{}' is not a supported format (PNG or JPEG).", source_name)
            }
            Self::Processing(_) => {
                "The photo could not be stylized; showing the original instead.".to_string()
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}
