use thiserror::Error;

#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("invalid idiom pattern: {message}")]
    InvalidPattern { message: String },

    #[error("replacement span [{byte_start}, {byte_end}) out of bounds for text of length {len}")]
    SpanOutOfBounds {
        byte_start: usize,
        byte_end: usize,
        len: usize,
    },

    #[error("replacement span starting at byte {byte_start} overlaps a prior replacement")]
    OverlappingSpans { byte_start: usize },

    #[error("text at [{byte_start}, {byte_end}) no longer matches the scanned occurrence")]
    StaleOccurrence { byte_start: usize, byte_end: usize },
}
