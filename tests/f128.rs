//! Binary128 parsing against reference bit patterns (the format has no
//! native type, so every expectation is explicit bits).

use atof::F128;

fn bits(s: &str) -> u128 {
    atof::parse::<F128>(s.as_bytes()).unwrap().to_bits()
}

#[test]
fn small_integers() {
    assert_eq!(bits("0"), 0);
    assert_eq!(bits("-0"), 1 << 127);
    assert_eq!(bits("1"), 0x3fff0000000000000000000000000000);
    assert_eq!(bits("2"), 0x40000000000000000000000000000000);
    assert_eq!(bits("-1"), 0xbfff0000000000000000000000000000);
}

#[test]
fn fractions() {
    assert_eq!(bits("0.1"), 0x3ffb999999999999999999999999999a);
    assert_eq!(
        bits("0.3333333333333333333333333333333333333"),
        0x3ffd5555555555555555555555555555
    );
    assert_eq!(
        bits("3.1415926535897932384626433832795028841"),
        0x4000921fb54442d18469898cc51701b8
    );
    assert_eq!(
        bits("2.718281828459045235360287471352662498"),
        0x40005bf0a8b1457695355fb8ac404e7a
    );
    assert_eq!(
        bits("123456789.123456789123456789123456789"),
        0x4019d6f34547e6b74df048579890dc7c
    );
}

#[test]
fn one_ulp_above_one() {
    assert_eq!(
        bits("1.0000000000000000000000000000000001926"),
        0x3fff0000000000000000000000000001
    );
}

#[test]
fn extremes() {
    // Largest finite value and the overflow cutoff.
    assert_eq!(
        bits("1.1897314953572317650857593266280070162e4932"),
        0x7ffeffffffffffffffffffffffffffff
    );
    assert_eq!(bits("1e4932"), 0x7ffeae596552b8fded99d037e3d04b75);
    assert_eq!(
        bits("9.9999999999999999999999999999999999e4931"),
        0x7ffeae596552b8fded99d037e3d04b75
    );
    assert_eq!(bits("1e5000"), 0x7fff0000000000000000000000000000);
    assert_eq!(bits("-1e5000"), 0xffff0000000000000000000000000000);
    assert_eq!(bits("1e-5000"), 0);
}

#[test]
fn subnormals() {
    // Smallest subnormal, a mid-range subnormal, the largest subnormal
    // and the smallest normal.
    assert_eq!(bits("6.4751751194380251109244389582276465525e-4966"), 1);
    assert_eq!(bits("1e-4940"), 0xcc64f1cc4376f7da08f39);
    assert_eq!(
        bits("3.3621031431120935062626778173217519551e-4932"),
        0x0000ffffffffffffffffffffffffffff
    );
    assert_eq!(
        bits("3.3621031431120935062626778173217526026e-4932"),
        0x00010000000000000000000000000000
    );
}

#[test]
fn long_mantissas() {
    // 38 significant digits is the u128 tokenizer cutoff; these straddle
    // it and must still be exact through the big decimal.
    assert_eq!(
        bits("1.00000000000000000000000000000000000000000000001"),
        0x3fff0000000000000000000000000000
    );
    assert_eq!(
        bits("123456789012345678901234567890123456789012345"),
        bits("1.23456789012345678901234567890123456789012345e44")
    );
}

#[test]
fn specials() {
    assert!(atof::parse::<F128>(b"nan").unwrap().is_nan());
    assert_eq!(bits("inf"), F128::INFINITY.to_bits());
    assert_eq!(bits("-infinity"), F128::NEG_INFINITY.to_bits());
}
