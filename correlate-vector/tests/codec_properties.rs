use correlate_core::errors::CodecError;
use correlate_vector::{decode, encode};
use proptest::prelude::*;

// ── Round-trip: decode(encode(v)) == v for all finite-length vectors ────

proptest! {
    #[test]
    fn round_trip_is_exact(vector in proptest::collection::vec(any::<f32>(), 0..256)) {
        let decoded = decode(&encode(&vector)).unwrap();
        prop_assert_eq!(decoded.len(), vector.len());
        for (a, b) in decoded.iter().zip(vector.iter()) {
            // Bitwise equality covers NaN payloads and signed zeros.
            prop_assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn encoded_length_is_header_plus_elements(vector in proptest::collection::vec(any::<f32>(), 0..256)) {
        prop_assert_eq!(encode(&vector).len(), 4 + vector.len() * 4);
    }

    #[test]
    fn truncating_payload_never_decodes_silently(
        vector in proptest::collection::vec(any::<f32>(), 1..64),
        cut in 1usize..4,
    ) {
        let mut encoded = encode(&vector);
        let new_len = encoded.len() - cut;
        encoded.truncate(new_len);
        prop_assert!(decode(&encoded).is_err());
    }

    #[test]
    fn random_bytes_never_yield_spurious_empty(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        match decode(&bytes) {
            // A successful decode must be internally consistent.
            Ok(vector) => prop_assert_eq!(bytes.len(), 4 + vector.len() * 4),
            Err(
                CodecError::Truncated { .. }
                | CodecError::LengthMismatch { .. }
                | CodecError::TrailingBytes { .. },
            ) => {}
            Err(other) => prop_assert!(false, "unexpected error {other:?}"),
        }
    }
}
