//! Binary codec for the collision types: fixed little-endian field
//! layouts wrapped in raw DEFLATE. This is a save-file/clipboard wire
//! format, so the layouts must stay stable bit-for-bit.

pub mod bytes;
pub mod codec;
pub mod compress;
pub mod error;

pub use bytes::{ByteReader, ByteWriter};
pub use codec::Codec;
pub use compress::{compress, decompress};
pub use error::PersistError;
