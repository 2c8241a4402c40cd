//! Errors which can happen while ingesting flat geometry buffers.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// The buffer does not consist of whole `(x, y, importance)` triples.
    #[error("coordinate buffer of length {len} is not a multiple of 3")]
    InvalidStride { len: usize },
    #[error("unknown geometry type `{0}`")]
    UnknownType(String),
    /// The nesting of the coordinates does not fit the declared geometry type.
    #[error("coordinates do not match geometry type `{kind}`")]
    ShapeMismatch { kind: String },
}
