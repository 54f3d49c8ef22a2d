//! End-to-end decimal parsing against reference bit patterns, with the
//! platform parser as a second witness for f32/f64.

use half::f16;

fn f64_bits(s: &str) -> u64 {
    atof::parse::<f64>(s.as_bytes()).unwrap().to_bits()
}

fn f32_bits(s: &str) -> u32 {
    atof::parse::<f32>(s.as_bytes()).unwrap().to_bits()
}

fn f16_bits(s: &str) -> u16 {
    atof::parse::<f16>(s.as_bytes()).unwrap().to_bits()
}

/// Parse `s` as f64 and f32, positive and negated, and require bit
/// equality with the standard library on each.
macro_rules! check_literal {
    ($($lit:literal),+ $(,)?) => {{
        $(
            let s: &str = $lit;
            assert_eq!(
                f64_bits(s),
                s.parse::<f64>().unwrap().to_bits(),
                "f64 {s}"
            );
            assert_eq!(
                f32_bits(s),
                s.parse::<f32>().unwrap().to_bits(),
                "f32 {s}"
            );
            let neg = format!("-{s}");
            assert_eq!(
                atof::parse::<f64>(neg.as_bytes()).unwrap().to_bits(),
                neg.parse::<f64>().unwrap().to_bits(),
                "f64 {neg}"
            );
            assert_eq!(
                atof::parse::<f32>(neg.as_bytes()).unwrap().to_bits(),
                neg.parse::<f32>().unwrap().to_bits(),
                "f32 {neg}"
            );
        )+
    }};
}

#[test]
fn reference_bits() {
    assert_eq!(f64_bits("0"), 0x0000000000000000);
    assert_eq!(f64_bits("-0"), 0x8000000000000000);
    assert_eq!(f32_bits("1"), 0x3f800000);
    assert_eq!(f32_bits("1.234e3"), 0x449a4000);
    assert_eq!(f64_bits("1e-700"), 0x0000000000000000);
    assert_eq!(f64_bits("1e+700"), 0x7ff0000000000000);
    assert_eq!(f64_bits("-INF"), 0xfff0000000000000);
    assert_eq!(f64_bits("0.7062146892655368"), 0x3fe6994f8c4b3584);
}

#[test]
fn ordinary() {
    check_literal!(
        "1.0",
        "3e-5",
        "0.1",
        "12345.",
        "0.9999999",
        "2.2250738585072014e-308",
        "1.23e45",
        "0.000000000000000000000000001",
        "7.3177701707893310e+15",
        "1.448997445238699",
    );
}

#[test]
fn near_halfway() {
    check_literal!(
        "1.00000005960464477539062499999",
        "1.000000059604644775390625",
        "1.00000005960464477539062500001",
        "1.00000017881393432617187499999",
        "1.000000178813934326171875",
        "1.00000017881393432617187500001",
        "16777217",
        "16777218",
        "9007199254740993",
        "9007199254740994",
        "36893488147419103229.0",
    );
}

#[test]
fn large() {
    check_literal!(
        "1e300",
        "123456789.34567e250",
        "943794359898089732078308743689303290943794359843568973207830874368930329.",
        "1.7976931348623157e308",
        "17976931348623157e292",
    );
}

#[test]
fn infinity_cutoff() {
    check_literal!("1e400", "1e309", "2e308", "1.7976931348624e308", "1.8e308");
}

#[test]
fn subnormals() {
    check_literal!(
        "5e-324",
        "91e-324",
        "1e-322",
        "13245643e-320",
        "2.22507385851e-308",
        "2.1e-308",
        "4.9406564584124654e-324",
        "2.2250738585072009e-308",
    );
}

#[test]
fn zero_cutoff() {
    check_literal!("0.0", "1e-325", "1e-326", "1e-500", "1e-1000");
}

#[test]
fn many_digits() {
    check_literal!(
        "12345678901234567890",
        "12345678901234567890123456789012345678901234567890e-50",
        "0.000123456789012345678901234567890123456789e-300",
        "10000000000000000000000000000000000000000e-17",
        "2.47032822920623272e-324",
        "2.4703282292062328e-324",
    );
    // 751 significant digits, exactly half the smallest f64 subnormal.
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
    assert_eq!(f64_bits(halfway), 0);
    check_literal!(
        "1000000000000000000000000000000000000000000000000000000000000000000000000001e-100"
    );
}

#[test]
fn underscores_match_plain() {
    assert_eq!(f64_bits("1_2_3.4_5e6_7"), f64_bits("123.45e67"));
    assert_eq!(f64_bits("123.45e67"), "123.45e67".parse::<f64>().unwrap().to_bits());
    assert_eq!(f32_bits("1_000_000"), f32_bits("1000000"));
    assert_eq!(f64_bits("0.000_001"), f64_bits("0.000001"));
}

#[test]
fn binary16_reference_bits() {
    // The flagged Eisel-Lemire weak spot: exactly half the smallest
    // binary16 subnormal must tie to even, i.e. +0.
    assert_eq!(f16_bits("2.98023223876953125E-8"), 0x0000);
    assert_eq!(f16_bits("0.0000000298023231"), 0x0001);
    // The midpoint of the first two subnormals ties to the even one.
    assert_eq!(f16_bits("8.94069671630859375e-8"), 0x0002);

    assert_eq!(f16_bits("0"), 0x0000);
    assert_eq!(f16_bits("-0"), 0x8000);
    assert_eq!(f16_bits("1"), 0x3c00);
    assert_eq!(f16_bits("-1"), 0xbc00);
    assert_eq!(f16_bits("1.5"), 0x3e00);
    assert_eq!(f16_bits("0.1"), 0x2e66);
    assert_eq!(f16_bits("0.333333333"), 0x3555);
    assert_eq!(f16_bits("3.141592653589793"), 0x4248);
    assert_eq!(f16_bits("0.0001"), 0x068e);
    assert_eq!(f16_bits("10000"), 0x70e2);
    assert_eq!(f16_bits("1e4"), 0x70e2);
    assert_eq!(f16_bits("65504"), 0x7bff);
    assert_eq!(f16_bits("65519.999"), 0x7bff);
    assert_eq!(f16_bits("65520"), 0x7c00);
    assert_eq!(f16_bits("7e4"), 0x7c00);
    assert_eq!(f16_bits("1e400"), 0x7c00);
    assert_eq!(f16_bits("-1e400"), 0xfc00);
    assert_eq!(f16_bits("1.0009765625"), 0x3c01);
    assert_eq!(f16_bits("6.103515625e-5"), 0x0400);
    assert_eq!(f16_bits("6.0975552e-5"), 0x03ff);
    assert_eq!(f16_bits("5.9604644775390625e-8"), 0x0001);
    assert_eq!(f16_bits("6.0e-8"), 0x0001);
    assert_eq!(f16_bits("1e-8"), 0x0000);
    assert_eq!(f16_bits("1e-100"), 0x0000);
}

#[test]
fn exponent_forms() {
    check_literal!("1e5", "1E5", "1e+5", "1e-5", "1.e3", ".5e3", "12.34E-56");
}
