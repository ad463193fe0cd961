use std::io::ErrorKind;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("town {0:?} is not part of the graph")]
    VertexNotFound(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("road file I/O error: {0:?}")]
    Io(ErrorKind),
    #[error("road file line {line}: missing {field} field")]
    MissingField { line: usize, field: &'static str },
    #[error("road file line {line}: invalid road distance {value:?}")]
    InvalidDistance { line: usize, value: String },
    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl From<std::io::Error> for LoadError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.kind())
    }
}
