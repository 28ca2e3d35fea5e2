//! Performance benchmarks for feature extraction and augmentation

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kws_dsp::{AudioBuffer, AugmentationEngine, MfccExtractor, NoiseLibrary, PipelineConfig, SeededRandom};

fn speech_like(len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let t = i as f32 / 16000.0;
            let envelope = (std::f32::consts::PI * t / 1.2).sin();
            envelope * (0.3 * (2.0 * std::f32::consts::PI * 220.0 * t).sin()
                + 0.1 * (2.0 * std::f32::consts::PI * 1800.0 * t).sin())
        })
        .collect()
}

fn bench_extract(c: &mut Criterion) {
    let config = PipelineConfig::default();
    let extractor = MfccExtractor::new(&config).unwrap();
    let buffer = AudioBuffer::new(speech_like(config.target_samples()), config.sample_rate);

    c.bench_function("mfcc_extract_1_2s", |b| {
        b.iter(|| {
            let _ = extractor.extract(black_box(&buffer));
        });
    });
}

fn bench_augment(c: &mut Criterion) {
    let config = PipelineConfig::default();
    let mut rng = SeededRandom::new(1);
    let noise: Vec<f32> = (0..16000 * 30)
        .map(|i| 0.1 * ((i as f32 * 12.9898).sin() * 43758.547).fract())
        .collect();
    let library = NoiseLibrary::new(AudioBuffer::new(noise, config.sample_rate)).unwrap();
    let engine = AugmentationEngine::new(&config.augmentation, &library);
    let source = AudioBuffer::new(speech_like(config.target_samples()), config.sample_rate);

    c.bench_function("augment_family_1_2s", |b| {
        b.iter(|| {
            let _ = engine.augment(black_box(&source), &mut rng);
        });
    });
}

criterion_group!(benches, bench_extract, bench_augment);
criterion_main!(benches);
