use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkiffshareError {
    /// A share event carried nothing usable as a file. The payload is the
    /// user-facing message and is displayed verbatim.
    #[error("{0}")]
    InvalidShareTarget(String),

    /// The platform could not turn a content URI into a file path.
    #[error("Could not resolve content URI: {0}")]
    UriResolution(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SkiffshareError>;
