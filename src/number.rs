//! The decimal tokenizer and the exact-arithmetic fast path.
//!
//! Tokenizing turns the byte slice into a `(mantissa, exponent, sign)`
//! triple plus the flags downstream tiers need. The grammar is
//!
//! ```text
//! number := digits ('.' digits?)? (('e'|'E') ('+'|'-')? digits)?
//!        |         '.' digits     (('e'|'E') ('+'|'-')? digits)?
//! digits := digit (('_')? digit)*
//! ```
//!
//! A `_` separator is accepted only between two digits of the same run;
//! anywhere else it is a syntax error.

use crate::error::{Error, Result};
use crate::float::Float;
use crate::num::Mantissa;
use crate::stream::{is_8digits, parse_8digits, Stream};

/// The tokenizer's output: the significant digits and scaled exponent of
/// the literal, `value = mantissa * 10^exponent` (or `* 2^exponent` for a
/// hex-float).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Number<M> {
    /// Decimal exponent, already adjusted for the fraction digits (binary
    /// exponent when `hex` is set).
    pub exponent: i64,
    /// The significant digits, truncated to the working width.
    pub mantissa: M,
    /// Sign of the literal, stripped by the facade.
    pub negative: bool,
    /// More significant digits were present than `mantissa` can carry, so
    /// `mantissa` holds a truncation and downstream tiers must treat the
    /// value as an interval.
    pub many_digits: bool,
    /// The literal was a hex-float.
    pub hex: bool,
}

impl<M: Mantissa> Number<M> {
    #[inline]
    fn is_fast_path<F: Float<Mantissa = M>>(&self) -> bool {
        F::MIN_EXPONENT_FAST_PATH <= self.exponent
            && self.exponent <= F::MAX_EXPONENT_DISGUISED_FAST_PATH
            && self.mantissa <= F::MAX_MANTISSA_FAST_PATH
            && !self.many_digits
    }

    /// The fast path, for mantissas and exponents that are both exactly
    /// representable in the target: a single native multiply or divide is
    /// guaranteed by IEEE-754 to round once, hence correctly.
    ///
    /// There is an exception: disguised fast-path cases, where the decimal
    /// exponent overshoots the exact range but the surplus powers of ten
    /// can be folded into the integer mantissa first.
    pub fn try_fast_path<F: Float<Mantissa = M>>(&self) -> Option<F> {
        if !self.is_fast_path::<F>() {
            return None;
        }
        if self.exponent <= F::MAX_EXPONENT_FAST_PATH {
            F::fast_path(self.mantissa, self.exponent)
        } else {
            let shift = (self.exponent - F::MAX_EXPONENT_FAST_PATH) as u32;
            let mantissa = self.mantissa.checked_mul(M::pow10(shift))?;
            if mantissa > F::MAX_MANTISSA_FAST_PATH {
                return None;
            }
            F::fast_path(mantissa, F::MAX_EXPONENT_FAST_PATH)
        }
    }
}

/// Consumes a `digits` run, accumulating into `mantissa` with wrapping
/// arithmetic and returning the number of digits consumed (zero when the
/// run is absent; the caller decides whether that is allowed). Runs of 8
/// plain digits take the word-at-a-time route.
fn scan_digits<M: Mantissa>(stream: &mut Stream<'_>, mantissa: &mut M) -> Result<usize> {
    let mut count = 0usize;
    loop {
        if stream.has(8) {
            let v = stream.read_u64();
            if is_8digits(v) {
                *mantissa = mantissa
                    .wrapping_mul(M::from_u64(100_000_000))
                    .wrapping_add(M::from_u64(parse_8digits(v)));
                stream.advance(8);
                count += 8;
                continue;
            }
        }
        if let Some(digit) = stream.scan_digit() {
            *mantissa = mantissa.wrapping_mul10_add(digit);
            count += 1;
            continue;
        }
        if stream.first_is(b'_') {
            // Only between two digits, and only one at a time.
            if count == 0 || !matches!(stream.peek(1), Some(c) if c.is_ascii_digit()) {
                return Err(Error::invalid());
            }
            stream.advance(1);
            continue;
        }
        return Ok(count);
    }
}

/// Parses the exponent that follows an already-consumed `e`/`E` (or
/// `p`/`P`): an optional sign and at least one digit. Digits beyond
/// ±65536 saturate; they cannot change the result past the overflow and
/// underflow cutoffs, but they are still validated.
pub(crate) fn parse_exponent(stream: &mut Stream<'_>) -> Result<i64> {
    let mut negative = false;
    if stream.first_is2(b'+', b'-') {
        negative = stream.first_is(b'-');
        stream.advance(1);
    }
    let mut value: i64 = 0;
    let mut count = 0usize;
    loop {
        if let Some(digit) = stream.scan_digit() {
            if value < 0x10000 {
                value = 10 * value + digit as i64;
            }
            count += 1;
            continue;
        }
        if stream.first_is(b'_') {
            if count == 0 || !matches!(stream.peek(1), Some(c) if c.is_ascii_digit()) {
                return Err(Error::invalid());
            }
            stream.advance(1);
            continue;
        }
        break;
    }
    if count == 0 {
        return Err(Error::invalid());
    }
    Ok(if negative { -value } else { value })
}

/// Tokenizes a decimal literal (sign already stripped). The whole input
/// must be consumed.
pub(crate) fn parse_number<M: Mantissa>(s: &[u8], negative: bool) -> Result<Number<M>> {
    debug_assert!(!s.is_empty());
    let mut stream = Stream::new(s);

    // Integer digits.
    let mut mantissa = M::ZERO;
    let n_int = scan_digits(&mut stream, &mut mantissa)?;
    let mut n_digits = n_int;

    // Fraction digits.
    let mut n_frac = 0usize;
    let mut exponent: i64 = 0;
    if stream.first_is(b'.') {
        stream.advance(1);
        n_frac = scan_digits(&mut stream, &mut mantissa)?;
        exponent = -(n_frac as i64);
    }
    n_digits += n_frac;
    if n_digits == 0 {
        return Err(Error::invalid());
    }

    // Exponent.
    if stream.first_is2(b'e', b'E') {
        stream.advance(1);
        exponent += parse_exponent(&mut stream)?;
    }

    // The facade insists on full consumption; trailing bytes are an error.
    if !stream.is_empty() {
        return Err(Error::invalid());
    }

    let mut many_digits = false;
    if n_digits > M::MAX_DIGITS {
        // Discount leading zeros before concluding the mantissa was
        // truncated; "0.00…" strings with a long zero prefix are common.
        let mut n_significant = n_digits;
        let mut probe = Stream::new(s);
        loop {
            match probe.first() {
                Some(b'0') => n_significant -= 1,
                Some(b'.') | Some(b'_') => {}
                _ => break,
            }
            probe.advance(1);
        }
        if n_significant > M::MAX_DIGITS {
            many_digits = true;
            mantissa = M::ZERO;
            // Second pass: rebuild the mantissa from exactly MAX_DIGITS
            // leading significant digits and recompute the exponent from
            // the position where that scan stops.
            let mut rescan = probe;
            rescan.reset();
            let mut after_point = false;
            let mut frac_skipped: i64 = 0;
            loop {
                match rescan.first() {
                    Some(b'0') => {
                        if after_point {
                            frac_skipped += 1;
                        }
                        rescan.advance(1);
                    }
                    Some(b'.') => {
                        after_point = true;
                        rescan.advance(1);
                    }
                    Some(b'_') => rescan.advance(1),
                    _ => break,
                }
            }
            let mut taken = 0usize;
            let mut frac_taken: i64 = 0;
            while taken < M::MAX_DIGITS {
                if let Some(digit) = rescan.scan_digit() {
                    mantissa = mantissa.wrapping_mul10_add(digit);
                    taken += 1;
                    if after_point {
                        frac_taken += 1;
                    }
                } else if rescan.first_is(b'.') {
                    after_point = true;
                    rescan.advance(1);
                } else {
                    // Separators only; digit availability is guaranteed by
                    // the significant-digit count.
                    rescan.advance(1);
                }
            }
            exponent = if after_point {
                -(frac_skipped + frac_taken)
            } else {
                // Count the integer digits the truncation dropped.
                let mut remaining: i64 = 0;
                loop {
                    match rescan.first() {
                        Some(c) if c.is_ascii_digit() => remaining += 1,
                        Some(b'_') => {}
                        _ => break,
                    }
                    rescan.advance(1);
                }
                remaining
            };
            // Re-apply the explicit exponent, which the first pass already
            // validated and clamped.
            let mut tail = rescan;
            loop {
                match tail.first() {
                    Some(b'e') | Some(b'E') => {
                        tail.advance(1);
                        exponent += parse_exponent(&mut tail)?;
                        break;
                    }
                    None => break,
                    _ => tail.advance(1),
                }
            }
        }
    }

    Ok(Number {
        exponent,
        mantissa,
        negative,
        many_digits,
        hex: false,
    })
}

/// Try to parse a special, non-finite literal: case-insensitive `inf`,
/// `infinity` or `nan`, with nothing following. Returns the positive
/// value; the facade applies the sign.
pub(crate) fn parse_inf_nan<F: Float>(s: &[u8]) -> Option<F> {
    // All valid specials are 3 or 8 bytes, so they fit in one register;
    // clearing bit 5 of every byte folds case for ASCII letters.
    const INF_3: u64 = 0x0046_4E49; // "INF"
    const NAN_3: u64 = 0x004E_414E; // "NAN"
    const INFINITY_8: u64 = 0x5954_494E_4946_4E49; // "INFINITY"

    let register = match s.len() {
        3 => (s[2] as u64) << 16 | (s[1] as u64) << 8 | s[0] as u64,
        8 => {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(s);
            u64::from_le_bytes(buf)
        }
        _ => return None,
    };
    match (register & 0xDFDF_DFDF_DFDF_DFDF, s.len()) {
        (INF_3, 3) | (INFINITY_8, 8) => Some(F::infinity()),
        (NAN_3, 3) => Some(F::quiet_nan()),
        _ => None,
    }
}

// TESTS
// -----

#[cfg(test)]
mod tests {
    use super::*;

    fn number(s: &str) -> Result<Number<u64>> {
        parse_number::<u64>(s.as_bytes(), false)
    }

    #[test]
    fn tokenize_test() {
        let num = number("123").unwrap();
        assert_eq!(num.mantissa, 123);
        assert_eq!(num.exponent, 0);
        assert!(!num.many_digits);

        let num = number("1.234e3").unwrap();
        assert_eq!(num.mantissa, 1234);
        assert_eq!(num.exponent, 0);

        let num = number(".5").unwrap();
        assert_eq!(num.mantissa, 5);
        assert_eq!(num.exponent, -1);

        let num = number("12.").unwrap();
        assert_eq!(num.mantissa, 12);
        assert_eq!(num.exponent, 0);

        let num = number("1e-3").unwrap();
        assert_eq!(num.mantissa, 1);
        assert_eq!(num.exponent, -3);

        let num = number("0.000123").unwrap();
        assert_eq!(num.mantissa, 123);
        assert_eq!(num.exponent, -6);

        // The word-at-a-time route and the scalar route must agree.
        let num = number("123456789012345.678").unwrap();
        assert_eq!(num.mantissa, 123456789012345678);
        assert_eq!(num.exponent, -3);
    }

    #[test]
    fn tokenize_invalid_test() {
        for s in [
            "", ".", "e5", ".e5", "1e", "1e+", "1x", "1 ", " 1", "1.2.3", "0x", "--1",
        ] {
            assert!(number(s).is_err(), "accepted {:?}", s);
        }
    }

    #[test]
    fn underscore_test() {
        let num = number("1_2_3.4_5e6_7").unwrap();
        assert_eq!(num.mantissa, 12345);
        assert_eq!(num.exponent, 67 - 2);

        assert_eq!(number("1_000").unwrap().mantissa, 1000);
        assert_eq!(number("12345678_9").unwrap().mantissa, 123456789);

        for s in ["_1", "1_", "1__2", "1_.2", "1._2", "1_e2", "1e_2", "1e2_", "_", "._1"] {
            assert!(number(s).is_err(), "accepted {:?}", s);
        }
    }

    #[test]
    fn many_digits_test() {
        // 20 digits: one too many for a u64 mantissa.
        let num = number("12345678901234567890").unwrap();
        assert!(num.many_digits);
        assert_eq!(num.mantissa, 1234567890123456789);
        assert_eq!(num.exponent, 1);

        let num = number("12345678901234567890e5").unwrap();
        assert_eq!(num.exponent, 6);

        // Leading zeros do not count as significant.
        let num = number("00000000001234567890.123456789").unwrap();
        assert!(!num.many_digits);
        assert_eq!(num.mantissa, 1234567890123456789);
        assert_eq!(num.exponent, -9);

        // Truncation that stops inside the fraction.
        let num = number("0.000123456789012345678901e-5").unwrap();
        assert!(num.many_digits);
        assert_eq!(num.mantissa, 1234567890123456789);
        assert_eq!(num.exponent, -22 - 5);

        // A long tail of zeros is still exact.
        let num = number("10000000000000000000000000").unwrap();
        assert!(num.many_digits);
        assert_eq!(num.mantissa, 1000000000000000000);
        assert_eq!(num.exponent, 7);
    }

    #[test]
    fn exponent_saturation_test() {
        let num = number("1e999999999999").unwrap();
        assert!(num.exponent > 65536);
        let num = number("1e-999999999999").unwrap();
        assert!(num.exponent < -65536);
    }

    #[test]
    fn fast_path_test() {
        // Teacher-known values: exact, disguised and rejected cases.
        let num = Number::<u64> {
            exponent: 15,
            mantissa: 123,
            negative: false,
            many_digits: false,
            hex: false,
        };
        assert_eq!(num.try_fast_path::<f32>(), Some(1.23e17));

        let num = Number::<u64> {
            exponent: 16,
            mantissa: 123,
            ..num
        };
        assert_eq!(num.try_fast_path::<f32>(), None);

        let num = Number::<u64> {
            exponent: -17,
            mantissa: 4628372940652459,
            ..num
        };
        assert_eq!(num.try_fast_path::<f64>(), Some(0.04628372940652459));

        let num = Number::<u64> {
            exponent: -272,
            mantissa: 26383446160308229,
            ..num
        };
        assert_eq!(num.try_fast_path::<f64>(), None);

        // Truncated mantissas never take the fast path.
        let num = Number::<u64> {
            exponent: 0,
            mantissa: 1,
            many_digits: true,
            ..num
        };
        assert_eq!(num.try_fast_path::<f64>(), None);
    }

    #[test]
    fn inf_nan_test() {
        assert_eq!(parse_inf_nan::<f64>(b"inf"), Some(f64::INFINITY));
        assert_eq!(parse_inf_nan::<f64>(b"INFINITY"), Some(f64::INFINITY));
        assert_eq!(parse_inf_nan::<f64>(b"iNfInItY"), Some(f64::INFINITY));
        assert!(parse_inf_nan::<f64>(b"nAn").unwrap().is_nan());
        assert_eq!(parse_inf_nan::<f64>(b"infx"), None);
        assert_eq!(parse_inf_nan::<f64>(b"infinit"), None);
        assert_eq!(parse_inf_nan::<f64>(b"na"), None);
        assert_eq!(parse_inf_nan::<f64>(b"123"), None);
    }
}
