//! Field elements of the relation.
//!
//! Every value in the relation is an element of the BLS12-381 scalar field,
//! which is also the base field of the Jubjub curve used by the Pedersen hash.
//! A Groth16 backend over BLS12-381 consumes relations over exactly this field.
//!
//! Field elements are displayed as `0x`-prefixed big-endian hex, the same
//! convention used for hashes in block explorers. The in-memory byte encoding
//! is little-endian.

use crate::error::FieldError;


/// An element of the relation field.
///
/// `Base` is the same type as `jubjub::Fq`.
pub type Base = bls12_381::Scalar;

/// The number of bytes in a canonical field element encoding.
pub const BASE_BYTES: usize = 32;

/// Returns the `0x`-prefixed, big-endian hex encoding of `value`.
pub fn to_hex(value: &Base) -> String {
    let mut bytes = value.to_bytes();
    bytes.reverse();

    format!("0x{}", hex::encode(bytes))
}

/// Parses a big-endian hex field element, with or without a `0x` prefix.
///
/// Short strings are zero-extended, so `"0x1"` parses as one.
/// Strings without any digits, such as `""` or `"0x"`, are rejected.
/// Values greater than or equal to the field modulus are rejected,
/// rather than silently reduced.
pub fn from_hex(hex_str: &str) -> Result<Base, FieldError> {
    let digits = hex_str
        .strip_prefix("0x")
        .or_else(|| hex_str.strip_prefix("0X"))
        .unwrap_or(hex_str);

    if digits.is_empty() {
        return Err(FieldError::Empty);
    }

    let digits = if digits.len() % 2 == 1 {
        format!("0{digits}")
    } else {
        digits.to_string()
    };

    let big_endian = hex::decode(digits)?;
    if big_endian.len() > BASE_BYTES {
        return Err(FieldError::TooLong(big_endian.len()));
    }

    let mut bytes = [0u8; BASE_BYTES];
    for (byte, source) in bytes.iter_mut().zip(big_endian.iter().rev()) {
        *byte = *source;
    }

    from_canonical_bytes(bytes)
}

/// Decodes a little-endian field element, rejecting values that are not reduced.
pub fn from_canonical_bytes(bytes: [u8; BASE_BYTES]) -> Result<Base, FieldError> {
    Option::<Base>::from(Base::from_bytes(&bytes)).ok_or(FieldError::NonCanonical)
}

/// Converts up to 32 little-endian bytes into a field element.
///
/// Inputs shorter than 32 bytes are zero-extended. Inputs of 31 bytes or
/// fewer are always less than the modulus, so no reduction happens.
pub(crate) fn from_short_bytes(bytes: &[u8]) -> Base {
    let mut wide = [0u8; 64];
    wide[..bytes.len()].copy_from_slice(bytes);

    Base::from_bytes_wide(&wide)
}

/// Serde helpers for hex field elements, for use with `#[serde(with = "...")]`.
pub mod hex_serde {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    use super::Base;

    /// Serializes `value` as a big-endian hex string.
    pub fn serialize<S: Serializer>(value: &Base, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_hex(value))
    }

    /// Deserializes a big-endian hex string into a canonical field element.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Base, D::Error> {
        let hex_str = String::deserialize(deserializer)?;

        super::from_hex(&hex_str).map_err(D::Error::custom)
    }
}

/// Serde helpers for lists of hex field elements.
pub mod hex_vec_serde {
    use serde::{de::Error as _, ser::SerializeSeq, Deserialize, Deserializer, Serializer};

    use super::Base;

    /// Serializes `values` as a list of big-endian hex strings.
    pub fn serialize<S: Serializer>(values: &[Base], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(values.len()))?;
        for value in values {
            seq.serialize_element(&super::to_hex(value))?;
        }
        seq.end()
    }

    /// Deserializes a list of big-endian hex strings.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Base>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|hex_str| super::from_hex(hex_str).map_err(D::Error::custom))
            .collect()
    }
}
