use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mimalloc::MiMalloc;
use pprof::criterion::{Output, PProfProfiler};
use std::io::Read;
use vabamorf_rs::{analyzer::AnalyseFlags, morph::PartOfSpeech, synth::SynthesiseRequest, MorphEngine};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn open_benchmark(c: &mut Criterion) {
    let dict_path = "dict.vabamorf.bin";

    let bytes = std::fs::File::open(dict_path)
        .expect("open dictionary file")
        .bytes()
        .count() as u64;

    let mut group = c.benchmark_group("engine open");
    group.sample_size(10);
    group.throughput(criterion::Throughput::Bytes(bytes));

    group.bench_function(BenchmarkId::new("open_mmap", 0), |b| {
        b.iter(|| black_box(MorphEngine::open_mmap(dict_path)))
    });
}

fn analyse_benchmark(c: &mut Criterion) {
    let dict_path = "dict.vabamorf.bin";
    let mut engine = MorphEngine::open_mmap(dict_path).expect("open engine");

    let binding = std::fs::read_to_string("benches/data/words.txt").expect("read word list");
    let words: Vec<&str> = binding.lines().collect();

    let bytes = std::fs::File::open("benches/data/words.txt")
        .expect("open word list")
        .bytes()
        .count() as u64;

    let mut group = c.benchmark_group("analyse");
    group.throughput(criterion::Throughput::Bytes(bytes));

    group.bench_with_input(BenchmarkId::new("analyse", 0), &words, |b, words| {
        b.iter(|| {
            for &word in words {
                let _ = engine.analyse(word, AnalyseFlags::default());
            }
        })
    });

    group.bench_with_input(BenchmarkId::new("analyse_guess", 1), &words, |b, words| {
        b.iter(|| {
            let flags = AnalyseFlags {
                guess: true,
                ..AnalyseFlags::default()
            };
            for &word in words {
                let _ = engine.analyse(word, flags);
            }
        })
    });

    group.bench_with_input(BenchmarkId::new("spell_check", 2), &words, |b, words| {
        b.iter(|| {
            for &word in words {
                let _ = engine.spell_check(word, true);
            }
        })
    });
}

fn synthesise_benchmark(c: &mut Criterion) {
    let dict_path = "dict.vabamorf.bin";
    let mut engine = MorphEngine::open_mmap(dict_path).expect("open engine");

    let binding = std::fs::read_to_string("benches/data/lemmas.txt").expect("read lemma list");
    let lemmas: Vec<&str> = binding.lines().collect();

    let mut group = c.benchmark_group("synthesise");

    group.bench_with_input(BenchmarkId::new("synthesise", 0), &lemmas, |b, lemmas| {
        b.iter(|| {
            for &lemma in lemmas {
                let req = SynthesiseRequest {
                    lemma,
                    pos: PartOfSpeech::Noun,
                    form_set: &["sg n".to_string()],
                    clitic: None,
                    paradigm_example: None,
                    guess: false,
                    phonetic: false,
                };
                let _ = engine.synthesise(&req);
            }
        })
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)));
    targets = analyse_benchmark, synthesise_benchmark
);

criterion_group!(open, open_benchmark);

criterion_main!(benches, open);
