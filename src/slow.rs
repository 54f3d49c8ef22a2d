//! The exact fallback: simple decimal conversion.
//!
//! When neither the fast path nor Eisel-Lemire can commit, the literal is
//! re-read into a big [`Decimal`] and shifted by powers of two until its
//! integer part is exactly the target's significand. Rounding then reads
//! the first fractional digit, with `truncated` as the sticky bit. Slow,
//! allocation-free, and always correct.

use crate::decimal::{parse_decimal, Decimal};
use crate::float::{BiasedFp, Float};
use crate::num::Mantissa;

/// Parses the (sign-stripped) literal via the big decimal. Always returns a
/// definite value.
pub(crate) fn parse_long_mantissa<F, M>(s: &[u8]) -> BiasedFp<M>
where
    M: Mantissa,
    F: Float<Mantissa = M>,
{
    // Shifts that keep every intermediate under 10^19 new digits per step;
    // for a decimal point of n, shifting by POWERS[n] bits brings the
    // point down without overshooting.
    const NUM_POWERS: usize = 19;
    const POWERS: [u8; 19] = [
        0, 3, 6, 9, 13, 16, 19, 23, 26, 29, 33, 36, 39, 43, 46, 49, 53, 56, 59,
    ];
    let get_shift = |n: usize| {
        if n < NUM_POWERS {
            POWERS[n] as usize
        } else {
            Decimal::<M>::MAX_SHIFT
        }
    };

    let fp_zero = BiasedFp::zero_pow2(0);
    let fp_inf = BiasedFp::zero_pow2(F::INFINITE_POWER);

    let mut d = parse_decimal::<M>(s);

    // Short-circuit if the value can only be a literal zero or infinity.
    if d.num_digits == 0 || d.decimal_point < F::MIN_DECIMAL_POINT {
        return fp_zero;
    } else if d.decimal_point >= F::MAX_DECIMAL_POINT {
        return fp_inf;
    }

    let mut exp2 = 0_i32;
    // Shift right toward (1/2 ... 1].
    while d.decimal_point > 0 {
        let n = d.decimal_point as usize;
        let shift = get_shift(n);
        d.right_shift(shift);
        if d.decimal_point < -Decimal::<M>::DECIMAL_POINT_RANGE {
            return fp_zero;
        }
        exp2 += shift as i32;
    }
    // Shift left toward (1/2 ... 1].
    while d.decimal_point <= 0 {
        let shift = if d.decimal_point == 0 {
            match d.digits.as_ref()[0] {
                digit if digit >= 5 => break,
                0 | 1 => 2,
                _ => 1,
            }
        } else {
            get_shift((-d.decimal_point) as usize)
        };
        d.left_shift(shift);
        if d.decimal_point > Decimal::<M>::DECIMAL_POINT_RANGE {
            return fp_inf;
        }
        exp2 -= shift as i32;
    }
    // We are now in (1/2, 1] but the binary format uses [1, 2).
    exp2 -= 1;
    while (F::MINIMUM_EXPONENT + 1) > exp2 {
        let mut n = ((F::MINIMUM_EXPONENT + 1) - exp2) as usize;
        if n > Decimal::<M>::MAX_SHIFT {
            n = Decimal::<M>::MAX_SHIFT;
        }
        d.right_shift(n);
        exp2 += n as i32;
    }
    if (exp2 - F::MINIMUM_EXPONENT) >= F::INFINITE_POWER {
        return fp_inf;
    }

    // Shift the decimal to the hidden bit, staying within the per-step
    // shift bound (binary128 needs two steps).
    let mut sig_shift = F::MANTISSA_EXPLICIT_BITS as usize + 1;
    while sig_shift > Decimal::<M>::MAX_SHIFT {
        d.left_shift(Decimal::<M>::MAX_SHIFT);
        sig_shift -= Decimal::<M>::MAX_SHIFT;
    }
    d.left_shift(sig_shift);

    let mut mantissa = d.round();
    if mantissa >= (M::ONE << (F::MANTISSA_EXPLICIT_BITS + 1)) {
        // Rounding up overflowed past the carry bit; shift back down to
        // the hidden bit and round again.
        d.right_shift(1);
        exp2 += 1;
        mantissa = d.round();
        if (exp2 - F::MINIMUM_EXPONENT) >= F::INFINITE_POWER {
            return fp_inf;
        }
    }
    let mut power2 = exp2 - F::MINIMUM_EXPONENT;
    if mantissa < (M::ONE << F::MANTISSA_EXPLICIT_BITS) {
        power2 -= 1;
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

    fn slow64(s: &str) -> (i32, u64) {
        let fp = parse_long_mantissa::<f64, _>(s.as_bytes());
        (fp.e, fp.f)
    }

    fn parts(x: f64) -> (i32, u64) {
        let bits = x.to_bits();
        (((bits >> 52) & 0x7FF) as i32, bits & ((1 << 52) - 1))
    }

    #[test]
    fn simple_test() {
        assert_eq!(slow64("1"), parts(1.0));
        assert_eq!(slow64("0.1"), parts(0.1));
        assert_eq!(slow64("12345.67890"), parts(12345.6789));
        assert_eq!(slow64("2.2250738585072014e-308"), parts(2.2250738585072014e-308));
    }

    #[test]
    fn cutoff_test() {
        assert_eq!(slow64("0"), (0, 0));
        assert_eq!(slow64("1e-400"), (0, 0));
        assert_eq!(slow64("1e400"), (f64::INFINITE_POWER, 0));
        assert_eq!(slow64("1.7976931348623157e308"), parts(f64::MAX));
        assert_eq!(slow64("1.7976931348623159e308"), (f64::INFINITE_POWER, 0));
    }

    #[test]
    fn subnormal_test() {
        assert_eq!(slow64("5e-324"), (0, 1));
        assert_eq!(slow64("4.9406564584124654e-324"), (0, 1));
        // A hair under half the smallest subnormal rounds down to zero; a
        // hair over rounds up to it.
        assert_eq!(slow64("2.47032822920623272e-324"), (0, 0));
        assert_eq!(slow64("2.4703282292062328e-324"), (0, 1));
        // Exactly half the smallest subnormal rounds to even, i.e. zero.
        let halfway = concat!(
            "2.4703282292062327208828439643411068618252990130716238221279284125033775363",
            "510437593264991818081799618989828234772285886546332835517796989819938739800",
            "539093906315035659515570226392290858392449105184435931802849936536152500319",
            "370457678249219365623669863658480757001585769269903706311928279558551332927",
            "834338409351978015531246597263579574622766465272827220056374006485499977096",
            "599470454020828166226237857393450736339007967761930577506740176324673600968",
            "951340535537458516661134223766678604162159680461914467291840300530057530849",
            "048765391711386591646239524912623653881879636239373280423891018672348497668",
            "235089863388587925628302755995657524455507255189313690836254779186948667994",
            "968324049705821028513185451396213837722826145437693412532098591327667236328",
            "125",
            "e-324"
        );
        assert_eq!(slow64(halfway), (0, 0));
        // One final digit bumped makes it round up instead.
        let above = concat!(
            "2.4703282292062327208828439643411068618252990130716238221279284125033775363",
            "510437593264991818081799618989828234772285886546332835517796989819938739800",
            "539093906315035659515570226392290858392449105184435931802849936536152500319",
            "370457678249219365623669863658480757001585769269903706311928279558551332927",
            "834338409351978015531246597263579574622766465272827220056374006485499977096",
            "599470454020828166226237857393450736339007967761930577506740176324673600968",
            "951340535537458516661134223766678604162159680461914467291840300530057530849",
            "048765391711386591646239524912623653881879636239373280423891018672348497668",
            "235089863388587925628302755995657524455507255189313690836254779186948667994",
            "968324049705821028513185451396213837722826145437693412532098591327667236328",
            "126",
            "e-324"
        );
        assert_eq!(slow64(above), (0, 1));
    }
}
