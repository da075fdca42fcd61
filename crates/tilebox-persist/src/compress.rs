use std::io::{Read, Write};

use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;

use crate::error::PersistError;

/// Compress an encoded buffer with raw DEFLATE (no zlib/gzip header).
pub fn compress(data: &[u8]) -> Result<Vec<u8>, PersistError> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| PersistError::CompressError(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| PersistError::CompressError(e.to_string()))
}

/// Decompress a raw-DEFLATE buffer.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, PersistError> {
    let mut decoder = DeflateDecoder::new(data);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| PersistError::DecompressError(e.to_string()))?;
    Ok(out)
}
