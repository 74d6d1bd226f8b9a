//! Benchmarks for building and querying the similarity index
//!
//! Run with: cargo bench --package similarity

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use similarity::SimilarityIndex;

const WORDS: &[&str] = &[
    "heist", "dream", "thief", "gotham", "batman", "joker", "love", "war", "space", "robot",
    "detective", "murder", "family", "journey", "island", "ghost", "city", "secret", "agent",
    "revenge", "school", "music", "ocean", "desert", "king", "queen", "dragon", "alien",
];

/// Deterministic synthetic overviews, roughly the size of the filtered catalog
fn synthetic_corpus(rows: usize) -> Vec<String> {
    (0..rows)
        .map(|i| {
            (0..25)
                .map(|j| WORDS[(i * 7 + j * 13 + i / 3) % WORDS.len()])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

fn bench_similarity(c: &mut Criterion) {
    let corpus = synthetic_corpus(9_000);

    c.bench_function("build_index_9000", |b| {
        b.iter(|| SimilarityIndex::build(black_box(corpus.as_slice())))
    });

    let index = SimilarityIndex::build(corpus.as_slice());
    c.bench_function("most_similar_top5", |b| {
        b.iter(|| index.most_similar(black_box(1234), 5))
    });
}

criterion_group!(benches, bench_similarity);
criterion_main!(benches);
