//! # Decimal Field-Element Codec
//!
//! The protocol's wire format renders every field element — commitments,
//! public signals, proof coordinates — as a decimal string. This module
//! converts between those strings and arkworks field elements.
//!
//! Two parse modes exist on purpose:
//!
//! - [`fr_from_decimal`] is **strict**: the value must be canonical
//!   (< modulus). Used for everything arriving on the wire, where an
//!   out-of-range value is malformed input.
//! - [`fr_from_decimal_mod`] **reduces** modulo the field. Used only for
//!   normalized secrets, which are deliberately full 256-bit integers.

use ark_bn254::Fr;
use ark_ff::PrimeField;

use crate::error::CryptoError;

/// Convert an ASCII decimal string to big-endian bytes.
///
/// Returns `None` if the string is empty or contains a non-digit.
pub fn decimal_to_bytes_be(s: &str) -> Option<Vec<u8>> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let mut out: Vec<u8> = vec![0];
    for b in s.bytes() {
        let mut carry = u16::from(b - b'0');
        for byte in out.iter_mut().rev() {
            let v = u16::from(*byte) * 10 + carry;
            *byte = (v & 0xff) as u8;
            carry = v >> 8;
        }
        while carry > 0 {
            out.insert(0, (carry & 0xff) as u8);
            carry >>= 8;
        }
    }
    Some(out)
}

/// Convert big-endian bytes to an ASCII decimal string.
pub fn bytes_be_to_decimal(bytes: &[u8]) -> String {
    let mut digits: Vec<u8> = Vec::new();
    let mut scratch = bytes.to_vec();
    loop {
        // Long division of the byte array by 10; the remainder is the
        // next least-significant decimal digit.
        let mut remainder: u16 = 0;
        let mut all_zero = true;
        for byte in scratch.iter_mut() {
            let v = remainder * 256 + u16::from(*byte);
            *byte = (v / 10) as u8;
            remainder = v % 10;
            if *byte != 0 {
                all_zero = false;
            }
        }
        digits.push(b'0' + remainder as u8);
        if all_zero {
            break;
        }
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_else(|_| "0".to_string())
}

/// Strictly parse a canonical decimal element of any prime field.
///
/// Rejects empty strings, non-digit characters, and values at or above the
/// field modulus. The rejection is what makes a `publicSignals` entry or
/// proof coordinate with a non-canonical encoding structurally malformed
/// rather than ambiguously equal to some reduced value.
pub fn fp_from_decimal<F: PrimeField>(s: &str) -> Result<F, CryptoError> {
    let bytes = decimal_to_bytes_be(s)
        .ok_or_else(|| CryptoError::InvalidFieldElement(s.to_string()))?;
    if bytes.len() > F::MODULUS_BIT_SIZE.div_ceil(8) as usize {
        return Err(CryptoError::InvalidFieldElement(s.to_string()));
    }
    let value = F::from_be_bytes_mod_order(&bytes);
    // Round-trip check detects values >= modulus that silently reduced.
    if fp_to_decimal(&value) != canonical_decimal(s) {
        return Err(CryptoError::InvalidFieldElement(s.to_string()));
    }
    Ok(value)
}

/// Render a prime-field element as its canonical decimal string.
pub fn fp_to_decimal<F: PrimeField>(value: &F) -> String {
    value.into_bigint().to_string()
}

/// Strictly parse a canonical decimal BN254 scalar. See [`fp_from_decimal`].
pub fn fr_from_decimal(s: &str) -> Result<Fr, CryptoError> {
    fp_from_decimal(s)
}

/// Parse a decimal integer of any width, reducing modulo the scalar field.
pub fn fr_from_decimal_mod(s: &str) -> Result<Fr, CryptoError> {
    let bytes = decimal_to_bytes_be(s)
        .ok_or_else(|| CryptoError::InvalidFieldElement(s.to_string()))?;
    Ok(Fr::from_be_bytes_mod_order(&bytes))
}

/// Render a BN254 scalar as its canonical decimal string.
pub fn fr_to_decimal(value: &Fr) -> String {
    fp_to_decimal(value)
}

/// Strip leading zeros so `"007"` and `"7"` compare equal.
fn canonical_decimal(s: &str) -> String {
    let trimmed = s.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
