/// Errors that can occur while encoding or decoding collision data.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("unexpected end of buffer: needed {expected} bytes, {actual} remain")]
    UnexpectedEof { expected: usize, actual: usize },

    #[error("DEFLATE compression failed: {0}")]
    CompressError(String),

    #[error("DEFLATE decompression failed: {0}")]
    DecompressError(String),
}
