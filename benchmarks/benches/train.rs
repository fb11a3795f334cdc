use benchmarks::{linear_design, student_frame};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gradecast::model::linear::LinearRegression;
use gradecast::preprocessing::{FittedTransformer, OneHotEncoder, Transformer};
use gradecast::trainer::Trainer;

fn bench_least_squares(c: &mut Criterion) {
    for n_features in [8usize, 41, 100] {
        let (x, y) = linear_design(2000, n_features, 42);
        c.bench_with_input(
            BenchmarkId::new("least_squares_fit", n_features),
            &(x, y),
            |b, (x, y)| {
                b.iter(|| {
                    let model = LinearRegression::new(n_features)
                        .fit(black_box(x), black_box(y))
                        .expect("fit");
                    black_box(model);
                });
            },
        );
    }
}

fn bench_one_hot(c: &mut Criterion) {
    let frame = student_frame(1000, 42).expect("synthetic frame");
    let (features, _) = frame.split_target("G3").expect("target");
    let encoder = OneHotEncoder::new(gradecast::catalog::categorical_columns());

    c.bench_function("one_hot_fit_transform", |b| {
        b.iter(|| black_box(encoder.fit_transform(black_box(&features)).expect("encode")));
    });

    let fitted = encoder.fit(&features).expect("fit");
    c.bench_function("one_hot_transform", |b| {
        b.iter(|| black_box(fitted.transform(black_box(&features)).expect("encode")));
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let trainer = Trainer::default();
    for n_rows in [395usize, 4000] {
        let frame = student_frame(n_rows, 42).expect("synthetic frame");
        c.bench_with_input(BenchmarkId::new("trainer_fit", n_rows), &frame, |b, frame| {
            b.iter(|| black_box(trainer.fit(black_box(frame)).expect("fit")));
        });
    }
}

criterion_group!(benches, bench_least_squares, bench_one_hot, bench_pipeline);
criterion_main!(benches);
