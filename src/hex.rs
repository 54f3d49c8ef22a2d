//! Hex-float literals: direct bit assembly.
//!
//! `0x1.8p-3` and friends carry their significand in base 16 and their
//! exponent in base 2, so no decimal rounding is involved: collect up to
//! `MANTISSA_EXPLICIT_BITS + 3` significant bits (round, guard, sticky),
//! then shift and round to even against the target geometry. The grammar is
//!
//! ```text
//! hexfloat := hexdigits ('.' hexdigits?)? (('p'|'P') ('+'|'-')? digits)?
//!          |            '.' hexdigits    (('p'|'P') ('+'|'-')? digits)?
//! ```
//!
//! after the `0x`/`0X` prefix, with the decimal underscore rules applying
//! to hex digit runs and to the exponent alike.

use crate::error::{Error, Result};
use crate::float::{BiasedFp, Float};
use crate::num::Mantissa;
use crate::number::{parse_exponent, Number};
use crate::stream::{to_hex_digit, Stream};

/// Consumes a run of hex digits, packing 4 bits per digit until the
/// accumulator is within one nibble of full, then folding the rest into
/// the binary exponent (integer part) or dropping it as sticky state
/// (fraction part).
fn scan_hex_digits<M: Mantissa>(
    stream: &mut Stream<'_>,
    mantissa: &mut M,
    exponent: &mut i64,
    truncated: &mut bool,
    fraction: bool,
) -> Result<usize> {
    let mut count = 0usize;
    loop {
        if let Some(digit) = stream.scan_hex_digit() {
            count += 1;
            if *mantissa >> (M::BITS - 4) == M::ZERO {
                *mantissa = (*mantissa << 4) | M::from_digit(digit);
                if fraction {
                    *exponent -= 4;
                }
            } else {
                if !fraction {
                    *exponent += 4;
                }
                if digit != 0 {
                    *truncated = true;
                }
            }
            continue;
        }
        if stream.first_is(b'_') {
            if count == 0 || !matches!(stream.peek(1), Some(c) if to_hex_digit(c).is_some()) {
                return Err(Error::invalid());
            }
            stream.advance(1);
            continue;
        }
        return Ok(count);
    }
}

/// Tokenizes a hex-float literal (prefix and sign already stripped). The
/// whole input must be consumed.
pub(crate) fn parse_hex_number<M: Mantissa>(s: &[u8], negative: bool) -> Result<Number<M>> {
    let mut stream = Stream::new(s);
    let mut mantissa = M::ZERO;
    let mut exponent: i64 = 0;
    let mut truncated = false;

    let mut n_digits = scan_hex_digits(&mut stream, &mut mantissa, &mut exponent, &mut truncated, false)?;
    if stream.first_is(b'.') {
        stream.advance(1);
        n_digits += scan_hex_digits(&mut stream, &mut mantissa, &mut exponent, &mut truncated, true)?;
    }
    if n_digits == 0 {
        return Err(Error::invalid());
    }
    if stream.first_is2(b'p', b'P') {
        stream.advance(1);
        exponent += parse_exponent(&mut stream)?;
    }
    if !stream.is_empty() {
        return Err(Error::invalid());
    }
    if truncated {
        // The dropped bits sit far below the rounding position; one sticky
        // bit keeps them visible to round-to-even.
        mantissa |= M::ONE;
    }
    Ok(Number {
        exponent,
        mantissa,
        negative,
        many_digits: truncated,
        hex: true,
    })
}

/// Assembles the positive value `mantissa * 2^exponent` into the target
/// format, rounding to even on the three extra bits and handling
/// subnormals and overflow.
pub(crate) fn convert_hex<F, M>(num: &Number<M>) -> BiasedFp<M>
where
    M: Mantissa,
    F: Float<Mantissa = M>,
{
    let mut mantissa = num.mantissa;
    let mut exponent = num.exponent;
    if mantissa == M::ZERO {
        return BiasedFp::zero_pow2(0);
    }

    // Put the most significant bit at the guard position.
    let target = F::MANTISSA_EXPLICIT_BITS + 3;
    let msb = M::BITS - 1 - mantissa.leading_zeros();
    if msb > target {
        let shift = msb - target;
        let dropped = mantissa & ((M::ONE << shift) - M::ONE);
        mantissa = mantissa >> shift;
        if dropped != M::ZERO {
            mantissa |= M::ONE;
        }
        exponent += shift as i64;
    } else {
        let shift = target - msb;
        mantissa = mantissa << shift;
        exponent -= shift as i64;
    }

    let biased = exponent + target as i64 - F::MINIMUM_EXPONENT as i64;
    let mut power2: i32;
    if biased <= 0 {
        // Subnormal: push the value into place, keeping everything that
        // falls off visible as a sticky bit.
        let shift = 1 - biased;
        if shift >= M::BITS as i64 {
            return BiasedFp::zero_pow2(0);
        }
        let shift = shift as u32;
        let dropped = mantissa & ((M::ONE << shift) - M::ONE);
        mantissa = mantissa >> shift;
        if dropped != M::ZERO {
            mantissa |= M::ONE;
        }
        power2 = 1;
    } else if biased >= F::INFINITE_POWER as i64 {
        return BiasedFp::zero_pow2(F::INFINITE_POWER);
    } else {
        power2 = biased as i32;
    }

    // Round to nearest, ties to even, on the three extra bits.
    let low = (mantissa & M::from_digit(7)).low_u64();
    mantissa = mantissa >> 3;
    if low > 4 || (low == 4 && mantissa & M::ONE == M::ONE) {
        mantissa = mantissa + M::ONE;
    }
    if mantissa >= (M::ONE << (F::MANTISSA_EXPLICIT_BITS + 1)) {
        mantissa = mantissa >> 1;
        power2 += 1;
    }
    if mantissa < (M::ONE << F::MANTISSA_EXPLICIT_BITS) {
        // Stayed below the hidden bit: subnormal, exponent field zero.
        power2 -= 1;
    }
    if power2 >= F::INFINITE_POWER {
        return BiasedFp::zero_pow2(F::INFINITE_POWER);
    }
    let mantissa = mantissa & ((M::ONE << F::MANTISSA_EXPLICIT_BITS) - M::ONE);
    BiasedFp {
        f: mantissa,
        e: power2,
    }
}

// TESTS
// -----

#[cfg(test)]
mod tests {
    use super::*;

    fn hex64(s: &str) -> u64 {
        let num = parse_hex_number::<u64>(s.as_bytes(), false).unwrap();
        let fp = convert_hex::<f64, _>(&num);
        fp.f | ((fp.e as u64) << 52)
    }

    #[test]
    fn tokenize_test() {
        let num = parse_hex_number::<u64>(b"1.8p1", false).unwrap();
        assert_eq!(num.mantissa, 0x18);
        assert_eq!(num.exponent, 1 - 4);
        assert!(num.hex);

        let num = parse_hex_number::<u64>(b"aB.cDp-3", false).unwrap();
        assert_eq!(num.mantissa, 0xABCD);
        assert_eq!(num.exponent, -3 - 8);

        let num = parse_hex_number::<u64>(b".8", false).unwrap();
        assert_eq!(num.mantissa, 8);
        assert_eq!(num.exponent, -4);

        let num = parse_hex_number::<u64>(b"1_2.3_4p5", false).unwrap();
        assert_eq!(num.mantissa, 0x1234);
        assert_eq!(num.exponent, 5 - 8);
    }

    #[test]
    fn tokenize_invalid_test() {
        for s in ["", ".", "p1", ".p1", "1p", "1p+", "1.2.3", "_1", "1_", "1_.2", "1p_1", "1g"] {
            assert!(
                parse_hex_number::<u64>(s.as_bytes(), false).is_err(),
                "accepted {:?}",
                s
            );
        }
    }

    #[test]
    fn convert_test() {
        assert_eq!(hex64("1p0"), 1.0f64.to_bits());
        assert_eq!(hex64("8p-3"), 1.0f64.to_bits());
        assert_eq!(hex64("1.8p1"), 3.0f64.to_bits());
        assert_eq!(hex64("1.fp+10"), 0x409F_0000_0000_0000);
        assert_eq!(hex64("abc.defp-10"), 0x4005_79BD_E000_0000);
        assert_eq!(hex64("1.921fb54442d18p+1"), 0x4009_21FB_5444_2D18);
        assert_eq!(hex64("0"), 0);
        assert_eq!(hex64("0p42"), 0);
    }

    #[test]
    fn convert_subnormal_test() {
        assert_eq!(hex64("1p-1074"), 1);
        assert_eq!(hex64("1p-1075"), 0); // exactly half, ties to even
        assert_eq!(hex64("1.8p-1074"), 2);
        assert_eq!(hex64("0.fffffffffffff8p-1022"), 0x0010_0000_0000_0000);
        assert_eq!(hex64("1p-1200"), 0);
    }

    #[test]
    fn convert_overflow_test() {
        assert_eq!(hex64("1.fffffffffffffp+1023"), f64::MAX.to_bits());
        assert_eq!(hex64("1p1024"), f64::INFINITY.to_bits());
        assert_eq!(hex64("ffffffffffffffffffp+1000"), f64::INFINITY.to_bits());
    }
}
