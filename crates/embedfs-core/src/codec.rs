//! Payload codec shared by the packer and the virtual filesystem.
//!
//! File contents are gzip-compressed at the best compression level and then
//! base64-encoded with the standard padded alphabet. For readability of the
//! generated source, the encoded text is wrapped into fixed-width lines.
//! Wrapping is cosmetic: [`decode`] strips all ASCII whitespace before
//! base64-decoding, so wrapped and unwrapped payloads decode identically.
//!
//! # Examples
//!
//! ```
//! use embedfs_core::codec;
//!
//! let payload = codec::encode(b"hello, embedded world", 16)?;
//! assert!(payload.contains('\n'));
//!
//! let bytes = codec::decode(&payload)?;
//! assert_eq!(bytes, b"hello, embedded world");
//! # Ok::<(), embedfs_core::CodecError>(())
//! ```

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::io::{Read, Write};
use thiserror::Error;

/// Errors produced while encoding or decoding a payload.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The gzip encoder could not be driven to completion.
    #[error("gzip compression failed: {0}")]
    Compress(#[source] std::io::Error),

    /// The payload is not valid base64 once whitespace is stripped.
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The base64 content is not a valid gzip stream.
    #[error("invalid gzip stream: {0}")]
    Decompress(#[source] std::io::Error),

    /// The decoded content does not have the declared length.
    #[error("decoded length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch {
        /// Length recorded at pack time
        expected: u64,
        /// Length actually produced by decoding
        actual: u64,
    },
}

/// Compresses `data` and encodes it as wrapped base64 text.
///
/// `chunk_width` is the maximum line length of the encoded text; `0` disables
/// wrapping. Text that already fits in one line is returned unwrapped.
///
/// # Errors
///
/// Returns [`CodecError::Compress`] if the gzip encoder fails.
pub fn encode(data: &[u8], chunk_width: usize) -> Result<String, CodecError> {
    let compressed = compress(data)?;
    Ok(wrap(&STANDARD.encode(compressed), chunk_width))
}

/// Gzip-compresses `data` at the best compression level.
///
/// # Errors
///
/// Returns [`CodecError::Compress`] if writing to or finishing the encoder fails.
pub fn compress(data: &[u8]) -> Result<Vec<u8>, CodecError> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 2), Compression::best());
    encoder.write_all(data).map_err(CodecError::Compress)?;
    encoder.finish().map_err(CodecError::Compress)
}

/// Splits `encoded` into lines of at most `width` characters.
///
/// The wrapped form starts and ends with a newline so that it sits on its own
/// lines inside a generated string literal.
#[must_use]
pub fn wrap(encoded: &str, width: usize) -> String {
    if width == 0 || encoded.len() <= width {
        return encoded.to_string();
    }

    let mut out = String::with_capacity(encoded.len() + encoded.len() / width + 2);
    out.push('\n');
    for (i, ch) in encoded.chars().enumerate() {
        if i > 0 && i % width == 0 {
            out.push('\n');
        }
        out.push(ch);
    }
    out.push('\n');
    out
}

/// Decodes a payload produced by [`encode`].
///
/// An empty payload (after whitespace removal) decodes to an empty buffer.
///
/// # Errors
///
/// Returns [`CodecError::Base64`] for malformed base64 and
/// [`CodecError::Decompress`] for a corrupt gzip stream.
pub fn decode(payload: &str) -> Result<Vec<u8>, CodecError> {
    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    if compact.is_empty() {
        return Ok(Vec::new());
    }

    let compressed = STANDARD.decode(compact)?;
    let mut decoder = GzDecoder::new(compressed.as_slice());
    let mut data = Vec::new();
    decoder
        .read_to_end(&mut data)
        .map_err(CodecError::Decompress)?;
    Ok(data)
}

/// Decodes a payload and checks it against the length recorded at pack time.
///
/// # Errors
///
/// Returns any [`decode`] error, or [`CodecError::LengthMismatch`] when the
/// decoded buffer is not exactly `expected` bytes long.
pub fn decode_exact(payload: &str, expected: u64) -> Result<Vec<u8>, CodecError> {
    let data = decode(payload)?;
    let actual = data.len() as u64;
    if actual != expected {
        return Err(CodecError::LengthMismatch { expected, actual });
    }
    Ok(data)
}
