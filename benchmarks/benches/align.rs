use benchmarks::{random_record, student_frame};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gradecast::align::align;
use gradecast::artifact::ArtifactPaths;
use gradecast::predictor::Predictor;
use gradecast::trainer::Trainer;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bench_align(c: &mut Criterion) {
    let frame = student_frame(400, 42).expect("synthetic frame");
    let artifact = Trainer::default().fit(&frame).expect("fit");
    let schema = artifact.schema();
    let mut rng = StdRng::seed_from_u64(7);
    let record = random_record(&mut rng);

    c.bench_function("align_full_record", |b| {
        b.iter(|| black_box(align(black_box(&record), schema)));
    });

    let sparse = gradecast::InputRecord::new().with("G2", 12).with("school", "MS");
    c.bench_function("align_sparse_record", |b| {
        b.iter(|| black_box(align(black_box(&sparse), schema)));
    });
}

fn bench_predict(c: &mut Criterion) {
    let dir = tempfile_dir();
    let frame = student_frame(400, 42).expect("synthetic frame");
    Trainer::default()
        .fit(&frame)
        .expect("fit")
        .save(&ArtifactPaths::in_dir(&dir))
        .expect("save");
    let predictor = Predictor::from_dir(&dir);

    let mut rng = StdRng::seed_from_u64(11);
    for batch in [1usize, 100, 1000] {
        let records: Vec<_> = (0..batch).map(|_| random_record(&mut rng)).collect();
        c.bench_with_input(BenchmarkId::new("predict_record", batch), &records, |b, records| {
            b.iter(|| {
                for record in records {
                    black_box(predictor.predict_record(black_box(record)).expect("predict"));
                }
            });
        });
    }

    let _ = std::fs::remove_dir_all(&dir);
}

fn tempfile_dir() -> std::path::PathBuf {
    std::env::temp_dir().join(format!("gradecast-bench-{}", std::process::id()))
}

criterion_group!(benches, bench_align, bench_predict);
criterion_main!(benches);
