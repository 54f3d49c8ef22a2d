#![feature(test)]

extern crate test;

use test::Bencher;

fn lcg(state: &mut u64) -> u64 {
    *state = state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    *state
}

/// Shortest representations of uniformly random finite doubles.
fn short_corpus() -> Vec<String> {
    let mut state = 0x9e3779b97f4a7c15u64;
    let mut buffer = ryu::Buffer::new();
    let mut corpus = Vec::with_capacity(1000);
    while corpus.len() < 1000 {
        let x = f64::from_bits(lcg(&mut state));
        if x.is_finite() {
            corpus.push(buffer.format_finite(x).to_owned());
        }
    }
    corpus
}

/// Long fixed-width digit strings that defeat the fast path.
fn long_corpus() -> Vec<String> {
    let mut state = 0x243f6a8885a308d3u64;
    (0..1000)
        .map(|_| {
            let mut s = String::with_capacity(32);
            for _ in 0..25 {
                s.push((b'0' + (lcg(&mut state) % 10) as u8) as char);
            }
            s.insert(1, '.');
            s.push_str(&format!("e{}", (lcg(&mut state) % 601) as i64 - 300));
            s
        })
        .collect()
}

fn total_bytes(corpus: &[String]) -> u64 {
    corpus.iter().map(|s| s.len() as u64).sum()
}

#[bench]
fn bench_parse_f64_short(b: &mut Bencher) {
    let corpus = short_corpus();
    b.bytes = total_bytes(&corpus);
    b.iter(|| {
        for s in &corpus {
            test::black_box(atof::parse::<f64>(s.as_bytes()).unwrap());
        }
    });
}

#[bench]
fn bench_parse_f64_long(b: &mut Bencher) {
    let corpus = long_corpus();
    b.bytes = total_bytes(&corpus);
    b.iter(|| {
        for s in &corpus {
            test::black_box(atof::parse::<f64>(s.as_bytes()).unwrap());
        }
    });
}

#[bench]
fn bench_parse_f32_short(b: &mut Bencher) {
    let corpus = short_corpus();
    b.bytes = total_bytes(&corpus);
    b.iter(|| {
        for s in &corpus {
            test::black_box(atof::parse::<f32>(s.as_bytes()).unwrap());
        }
    });
}

#[bench]
fn bench_parse_f64_std_baseline(b: &mut Bencher) {
    let corpus = short_corpus();
    b.bytes = total_bytes(&corpus);
    b.iter(|| {
        for s in &corpus {
            test::black_box(s.parse::<f64>().unwrap());
        }
    });
}

#[bench]
fn bench_parse_hex(b: &mut Bencher) {
    let corpus: Vec<String> = {
        let mut state = 0x452821e638d01377u64;
        (0..1000)
            .map(|_| {
                format!(
                    "0x{:x}.{:013x}p{}",
                    lcg(&mut state) % 16,
                    lcg(&mut state) & 0xFFFF_FFFF_FFFF_F,
                    (lcg(&mut state) % 2001) as i64 - 1000
                )
            })
            .collect()
    };
    b.bytes = total_bytes(&corpus);
    b.iter(|| {
        for s in &corpus {
            test::black_box(atof::parse::<f64>(s.as_bytes()).unwrap());
        }
    });
}
