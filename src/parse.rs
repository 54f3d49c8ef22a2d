//! The facade: sign, specials, and the tier sequence.
//!
//! A parse runs at most four stages, each strictly cheaper than the next
//! is: tokenize, try the exact fast path, try Eisel-Lemire, fall back to
//! the big decimal. A tier only runs when every earlier tier declined, and
//! the first committed result is final.

use crate::error::{Error, Result};
use crate::float::{BiasedFp, Float};
use crate::num::Mantissa;
use crate::{hex, number, slow};

/// Parses `bytes` into the target format, correctly rounded.
pub(crate) fn parse_float<F: Float>(bytes: &[u8]) -> Result<F> {
    let mut s = bytes;
    let first = match s.first() {
        Some(&c) => c,
        None => return Err(Error::empty()),
    };
    let negative = first == b'-';
    if first == b'-' || first == b'+' {
        s = &s[1..];
        if s.is_empty() {
            return Err(Error::invalid());
        }
    }

    if let Some(value) = number::parse_inf_nan::<F>(s) {
        return Ok(apply_sign(value, negative));
    }
    if s.len() >= 2 && s[0] == b'0' && (s[1] == b'x' || s[1] == b'X') {
        let num = hex::parse_hex_number::<F::Mantissa>(&s[2..], negative)?;
        let fp = hex::convert_hex::<F, _>(&num);
        return Ok(apply_sign(F::from_biased_fp(fp), negative));
    }

    let num = number::parse_number::<F::Mantissa>(s, negative)?;
    if let Some(value) = num.try_fast_path::<F>() {
        return Ok(apply_sign(value, negative));
    }

    let mut fp = F::eisel_lemire(num.exponent, num.mantissa);
    if num.many_digits
        && !fp.is_invalid()
        && fp != F::eisel_lemire(num.exponent, num.mantissa + <F::Mantissa as Mantissa>::ONE)
    {
        // The truncated mantissa straddles a rounding boundary: only a
        // result that is stable against a one-ulp bump of the input can be
        // trusted.
        fp = BiasedFp::invalid();
    }
    if fp.is_invalid() {
        fp = slow::parse_long_mantissa::<F, _>(s);
    }
    Ok(apply_sign(F::from_biased_fp(fp), negative))
}

#[inline]
fn apply_sign<F: Float>(value: F, negative: bool) -> F {
    if negative {
        -value
    } else {
        value
    }
}

// TESTS
// -----
