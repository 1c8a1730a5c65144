use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use knucleotide::config::{RunConfig, FRAGMENT_LENGTHS};
use knucleotide::kmer::{pack_fragment, EncodedSequence, KmerLength};
use knucleotide::run::count;
use knucleotide::scheduler::{count_offset, FragmentScheduler};
use knucleotide::table::CountTable;

/// Deterministic pseudo-random bases, so every run counts the same input.
fn sample_sequence(len: usize) -> EncodedSequence {
    let mut state: u32 = 42;
    let bases: Vec<u8> = (0..len)
        .map(|_| {
            state = (state * 3877 + 29573) % 139_968;
            b"ACGT"[(state % 4) as usize]
        })
        .collect();
    EncodedSequence::from_bases(&bases)
}

fn bench_pack_fragment(c: &mut Criterion) {
    let mut group = c.benchmark_group("pack_fragment");

    for k in [1, 6, 12, 18] {
        let fragment = "GGTATTTTAATTTATAGT"[..k].to_string();
        group.bench_with_input(BenchmarkId::from_parameter(k), &fragment, |b, fragment| {
            b.iter(|| pack_fragment(black_box(fragment.as_bytes())))
        });
    }

    group.finish();
}

fn bench_table_increment(c: &mut Criterion) {
    let mut group = c.benchmark_group("CountTable::increment");

    for distinct in [16u64, 4096, 1 << 18] {
        group.bench_with_input(
            BenchmarkId::from_parameter(distinct),
            &distinct,
            |b, &distinct| {
                b.iter(|| {
                    let mut table = CountTable::new();
                    for key in 0..100_000u64 {
                        table.increment(key.wrapping_mul(0x9E37_79B9) % distinct);
                    }
                    black_box(table)
                })
            },
        );
    }

    group.finish();
}

fn bench_count_offset(c: &mut Criterion) {
    let mut group = c.benchmark_group("count_offset");
    let sequence = sample_sequence(100_000);

    for len in FRAGMENT_LENGTHS {
        let k = KmerLength::new(len).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(len), &k, |b, &k| {
            b.iter(|| count_offset(black_box(&sequence), k, 0))
        });
    }

    group.finish();
}

fn bench_scheduler(c: &mut Criterion) {
    let mut group = c.benchmark_group("FragmentScheduler::spawn");
    group.sample_size(20);
    let sequence = sample_sequence(250_000);
    let lengths: Vec<KmerLength> = FRAGMENT_LENGTHS
        .iter()
        .map(|&len| KmerLength::new(len).unwrap())
        .collect();

    for workers in [1, 2, 4, 8] {
        group.bench_with_input(
            BenchmarkId::from_parameter(workers),
            &workers,
            |b, &workers| {
                b.iter(|| {
                    FragmentScheduler::new(workers)
                        .spawn(black_box(&sequence), &lengths)
                        .join()
                })
            },
        );
    }

    group.finish();
}

fn bench_full_report(c: &mut Criterion) {
    let sequence = sample_sequence(250_000);
    let config = RunConfig::default();

    c.bench_function("count + report", |b| {
        b.iter(|| count(black_box(&sequence), &config))
    });
}

criterion_group!(
    benches,
    bench_pack_fragment,
    bench_table_increment,
    bench_count_offset,
    bench_scheduler,
    bench_full_report,
);

criterion_main!(benches);
