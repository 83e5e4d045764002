use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use wavecut::viewport::ViewportModel;
use wavecut::waveform::column_envelope;

const SECONDS: usize = 600;
const VISIBLE_WIDTH: usize = 800;

fn speech_like(len: usize) -> Vec<i16> {
    (0..len)
        .map(|i| {
            let phase = i as f32 / 8_000.0;
            let carrier = (phase * 440.0 * std::f32::consts::TAU).sin();
            let gate = if (i / 4_000) % 2 == 0 { 1.0 } else { 0.1 };
            (carrier * gate * i16::MAX as f32 * 0.8) as i16
        })
        .collect()
}

fn bench_envelope(c: &mut Criterion) {
    let samples = speech_like(SECONDS * 8_000);
    let mut group = c.benchmark_group("column_envelope");
    for zoom in [1u32, 4, 32] {
        let mut viewport = ViewportModel::new(15);
        viewport.configure(samples.len(), VISIBLE_WIDTH);
        let mid = samples.len() / 2;
        viewport.set_zoom(zoom, (mid, mid));
        group.bench_with_input(BenchmarkId::from_parameter(zoom), &viewport, |b, view| {
            b.iter(|| {
                column_envelope(
                    black_box(&samples),
                    view.page_start(),
                    view.samples_per_pixel(),
                    view.visible_width(),
                )
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_envelope);
criterion_main!(benches);
