//! Benchmarks for the keyterm tokenizer.
//!
//! # Running benchmarks
//! ```bash
//! cargo bench --bench tokenize
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use termsplit::Tokenizer;

const SQF_SNIPPET: &str = "if (_x >= 2) then {_y = !_z;} else {hint \"no\";};\n\
// spawn loop\n\
[] spawn { while {alive player} do { sleep 1; _n = _n + 1; }; };\n";

fn bench_sqf(c: &mut Criterion) {
    // Cache disabled so every iteration runs the scanner
    let vocab = termsplit::PretrainedVocab::Sqf.vocabulary().unwrap();
    let tokenizer = Tokenizer::with_cache_size(vocab, 0).unwrap();

    let mut group = c.benchmark_group("sqf");
    for repeat in [1usize, 16, 256] {
        let text = SQF_SNIPPET.repeat(repeat);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(repeat), &text, |b, text| {
            b.iter(|| tokenizer.split(black_box(text)))
        });
    }
    group.finish();
}

fn bench_shadowing(c: &mut Criterion) {
    // A long keyterm that keeps shadowing the short ones and fails at the end
    let long = format!("{}!", "ab ".repeat(64));
    let tokenizer = Tokenizer::with_cache_size(
        termsplit::Vocabulary::new([long.as_str(), "ab", " "]).unwrap(),
        0,
    )
    .unwrap();
    let text = format!("{}?", "ab ".repeat(64)).repeat(16);

    c.bench_function("shadowing", |b| b.iter(|| tokenizer.split(black_box(&text))));
}

fn bench_batch(c: &mut Criterion) {
    let tokenizer = Tokenizer::from_pretrained("sqf").unwrap();
    let texts: Vec<String> = (0..1024)
        .map(|i| format!("_v{} = [{}, \"item\"] select 0;", i, i))
        .collect();

    c.bench_function("batch_1024", |b| {
        b.iter(|| {
            tokenizer.clear_cache();
            tokenizer.tokenize_batch(black_box(&texts))
        })
    });
}

criterion_group!(benches, bench_sqf, bench_shadowing, bench_batch);
criterion_main!(benches);
