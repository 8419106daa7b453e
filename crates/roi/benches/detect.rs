use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use event::{NEUTRAL, ON_VALUE};
use roi::{RoiConfig, RoiDetector};

fn frame_with_object(width: usize, height: usize) -> Vec<u8> {
    let mut frame = vec![NEUTRAL; width * height];
    for y in height / 3..height / 2 {
        for x in width / 3..width / 2 {
            frame[y * width + x] = ON_VALUE;
        }
    }
    frame
}

fn benchmark_detectors(c: &mut Criterion) {
    let mut group = c.benchmark_group("roi_detect");

    for (width, height, label) in [(640, 480, "VGA"), (960, 720, "DVS native")] {
        let frame = frame_with_object(width, height);
        let detector = RoiDetector::new(RoiConfig::default(), width, height);

        group.bench_with_input(BenchmarkId::new("average", label), &frame, |b, frame| {
            b.iter(|| detector.detect_average(black_box(frame)));
        });

        group.bench_with_input(BenchmarkId::new("streak", label), &frame, |b, frame| {
            b.iter(|| detector.detect_streak(black_box(frame)));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_detectors);
criterion_main!(benches);
