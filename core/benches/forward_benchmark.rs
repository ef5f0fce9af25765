use criterion::{Criterion, criterion_group, criterion_main};
use decoder_rs::model::{ForwardPipeline, ModelConfig};
use decoder_rs::nn::{Mode, self_attention};
use decoder_rs::random::{StdRandom, random_matrix};
use std::hint::black_box;

fn benchmark_attention(c: &mut Criterion) {
    let mut group = c.benchmark_group("self_attention");
    let mut rng = StdRandom::seeded(0);

    for &seq_len in &[16, 64, 128] {
        let x = random_matrix::<f32>(seq_len, 256, &mut rng);
        group.bench_function(format!("seq{}_embed256_heads4", seq_len), |b| {
            b.iter(|| self_attention(black_box(&x), &x, &x, 4).unwrap())
        });
    }
    group.finish();
}

fn benchmark_forward(c: &mut Criterion) {
    let mut group = c.benchmark_group("forward");
    let mut rng = StdRandom::seeded(1);
    let config = ModelConfig::reference();
    let pipeline = ForwardPipeline::<f32>::random(&config, &mut rng).unwrap();
    let tokens: Vec<usize> = (0..config.max_seq_length).collect();

    group.bench_function("reference_eval_128_tokens", |b| {
        b.iter(|| {
            pipeline
                .forward(black_box(&tokens), Mode::Eval, &mut rng)
                .unwrap()
        })
    });

    // Includes sampling ~1.1M weights per iteration.
    group.bench_function("reference_fresh_weights_16_tokens", |b| {
        b.iter(|| {
            let pipeline = ForwardPipeline::<f32>::random(&config, &mut rng).unwrap();
            pipeline
                .forward(black_box(&tokens[..16]), Mode::Train, &mut rng)
                .unwrap()
        })
    });
    group.finish();
}

criterion_group!(benches, benchmark_attention, benchmark_forward);
criterion_main!(benches);
