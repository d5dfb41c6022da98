//! Byte codec for correlation vectors.
//!
//! Layout: a u32 little-endian element count, then each f32 in
//! little-endian order. Deterministic and endianness-stable, so encoded
//! bytes remain valid across process restarts and architectures.

use correlate_core::errors::CodecError;

const HEADER_LEN: usize = 4;
const ELEM_LEN: usize = 4;

/// Encode a float vector. Exact inverse of [`decode`] for any
/// finite-length input, including the empty vector.
pub fn encode(vector: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(HEADER_LEN + vector.len() * ELEM_LEN);
    bytes.extend_from_slice(&(vector.len() as u32).to_le_bytes());
    for value in vector {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Decode bytes produced by [`encode`]. Malformed input fails with a
/// [`CodecError`], never a silent zero-length result.
pub fn decode(bytes: &[u8]) -> Result<Vec<f32>, CodecError> {
    if bytes.len() < HEADER_LEN {
        return Err(CodecError::Truncated { len: bytes.len() });
    }

    let declared = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
    let payload = &bytes[HEADER_LEN..];
    let actual = payload.len() / ELEM_LEN;

    if payload.len() % ELEM_LEN != 0 {
        return Err(CodecError::TrailingBytes {
            extra: payload.len() % ELEM_LEN,
        });
    }
    if declared != actual {
        return Err(CodecError::LengthMismatch { declared, actual });
    }

    let mut vector = Vec::with_capacity(declared);
    for chunk in payload.chunks_exact(ELEM_LEN) {
        vector.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }
    Ok(vector)
}
