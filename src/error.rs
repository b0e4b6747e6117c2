use thiserror::Error;

#[derive(Debug, Error)]
pub enum SynthError {
    #[error("Parsing Error: {0}")]
    ParseError(String),
    #[error("File Error: {0}")]
    FileError(String),
    #[error("Invalid Instrument Error: {0}")]
    InvalidInstrument(String),
    #[error("Export Error: {0}")]
    ExportError(#[from] hound::Error),
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
}

/// A rendered mix whose export failed. The samples are handed back so the
/// caller can retry without rendering again.
#[derive(Error)]
#[error("{source}")]
pub struct ExportFailure {
    pub buffer: Vec<f32>,
    #[source]
    pub source: SynthError,
}

impl std::fmt::Debug for ExportFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("ExportFailure")
            .field("samples", &self.buffer.len())
            .field("source", &self.source)
            .finish()
    }
}

impl From<ExportFailure> for SynthError {
    fn from(failure: ExportFailure) -> Self {
        failure.source
    }
}
