use std::fmt;
use std::path::{Path, PathBuf};

/// A reference to an encoded image
#[derive(Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Local file path
    Path(PathBuf),
    /// Encoded image bytes already in memory
    Bytes(Vec<u8>),
    /// `data:<mime>;base64,<payload>` URL or a bare base64 string
    DataUrl(String),
    /// Remote http(s) URL
    Url(String),
}

impl ImageSource {
    /// Classify a user supplied reference by its prefix
    pub fn parse(reference: &str) -> Self {
        let trimmed = reference.trim();
        let lower = trimmed.to_ascii_lowercase();

        if lower.starts_with("data:") {
            ImageSource::DataUrl(trimmed.to_string())
        } else if lower.starts_with("http://") || lower.starts_with("https://") {
            ImageSource::Url(trimmed.to_string())
        } else {
            ImageSource::Path(PathBuf::from(trimmed))
        }
    }

    /// Short human-readable name used in logs and errors
    pub fn describe(&self) -> String {
        match self {
            ImageSource::Path(path) => path.display().to_string(),
            ImageSource::Bytes(bytes) => format!("<{} bytes in memory>", bytes.len()),
            ImageSource::DataUrl(data) => {
                let header = data.split(',').next().unwrap_or_default();
                format!("<{} ({} chars)>", header, data.len())
            }
            ImageSource::Url(url) => url.clone(),
        }
    }
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageSource({})", self.describe())
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        ImageSource::Path(path)
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        ImageSource::Path(path.to_path_buf())
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        ImageSource::Bytes(bytes)
    }
}

impl From<&str> for ImageSource {
    fn from(reference: &str) -> Self {
        ImageSource::parse(reference)
    }
}
