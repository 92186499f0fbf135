//! Performance benchmarks for analysis and event generation

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lumen_gen::analysis::analyze_samples;
use lumen_gen::config::{AnalysisConfig, GenerationSettings};
use lumen_gen::generate::{generate_events, GenerationInput, GenerationMode};
use lumen_gen::timeline::tempo::TempoMap;

/// 4-on-floor kick pattern (30 seconds at 44.1 kHz)
fn kick_pattern() -> Vec<f32> {
    let sample_rate = 44100.0f32;
    let num_samples = (30.0 * sample_rate) as usize;
    let mut samples = vec![0.0f32; num_samples];
    let beat_interval = (60.0 / 120.0 * sample_rate) as usize;
    let kick_samples = (0.1 * sample_rate) as usize;

    let mut pos = 0;
    while pos < num_samples {
        for i in 0..kick_samples.min(num_samples - pos) {
            let t = i as f32 / sample_rate;
            samples[pos + i] =
                (t * 80.0 * 2.0 * std::f32::consts::PI).sin() * (-t * 40.0).exp() * 0.8;
        }
        pos += beat_interval;
    }
    samples
}

fn bench_analyze_samples(c: &mut Criterion) {
    let samples = kick_pattern();
    let tempo = TempoMap::constant(120.0);
    let config = AnalysisConfig::default();

    c.bench_function("analyze_samples_30s", |b| {
        b.iter(|| {
            let _ = analyze_samples(
                black_box(&samples),
                black_box(44100),
                black_box(&config),
                black_box(&tempo),
            );
        });
    });
}

fn bench_generate_events(c: &mut Criterion) {
    let samples = kick_pattern();
    let tempo = TempoMap::constant(120.0);
    let analysis =
        analyze_samples(&samples, 44100, &AnalysisConfig::default(), &tempo).unwrap();
    let settings = GenerationSettings {
        mode: GenerationMode::Beats,
        ..Default::default()
    };

    c.bench_function("generate_events_30s", |b| {
        b.iter(|| {
            let _ = generate_events(
                GenerationInput {
                    analysis: Some(black_box(&analysis)),
                    tab_events: None,
                },
                black_box(&tempo),
                black_box(&settings),
            );
        });
    });
}

criterion_group!(benches, bench_analyze_samples, bench_generate_events);
criterion_main!(benches);
