use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimodError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("worker pool error: {0}")]
    Pool(String),
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, SimodError>;
