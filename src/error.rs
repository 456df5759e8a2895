use std::fmt;
use std::io;
use std::path::PathBuf;

/// Error type for everything the editor core does with levels, tilesets and settings
#[derive(Debug)]
pub enum EditorError {
    /// A level, tileset or editor data file does not exist
    ResourceNotFound {
        /// Missing file
        path: PathBuf,
    },
    /// A level or attribute file has an unexpected structure
    Format {
        /// File being decoded
        path: PathBuf,
        /// What was wrong
        reason: String,
    },
    /// Reading or writing a file failed
    Io {
        /// File being read or written
        path: PathBuf,
        /// Underlying failure
        source: io::Error,
    },
    /// An image file could not be decoded
    Image {
        /// Image file
        path: PathBuf,
        /// Decoder failure
        source: image::ImageError,
    },
    /// The settings file could not be parsed or serialized
    Settings {
        /// Settings file
        path: PathBuf,
        /// Parser failure
        source: serde_json::Error,
    },
    /// An operation was attempted while its prerequisites were not met
    InvalidState(String),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, EditorError>;

impl EditorError {
    pub(crate) fn format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        EditorError::Format {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Maps a read failure to `ResourceNotFound` when the file is missing.
    pub(crate) fn from_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            EditorError::ResourceNotFound { path }
        } else {
            EditorError::Io { path, source }
        }
    }
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorError::ResourceNotFound { path } => {
                write!(f, "Resource not found: {}", path.display())
            }
            EditorError::Format { path, reason } => {
                write!(f, "Malformed file {}: {}", path.display(), reason)
            }
            EditorError::Io { path, source } => {
                write!(f, "I/O error on {}: {}", path.display(), source)
            }
            EditorError::Image { path, source } => {
                write!(f, "Failed to decode image {}: {}", path.display(), source)
            }
            EditorError::Settings { path, source } => {
                write!(f, "Settings error in {}: {}", path.display(), source)
            }
            EditorError::InvalidState(msg) => write!(f, "Invalid editor state: {}", msg),
        }
    }
}

impl std::error::Error for EditorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EditorError::Io { source, .. } => Some(source),
            EditorError::Image { source, .. } => Some(source),
            EditorError::Settings { source, .. } => Some(source),
            _ => None,
        }
    }
}
