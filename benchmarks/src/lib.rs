//! Synthetic inputs for the gradecast benchmarks.
//!
//! Everything here is generated from a seed so runs are comparable without
//! shipping the real dataset.

use gradecast::catalog::{CATEGORICAL_FIELDS, NUMERIC_FIELDS};
use gradecast::dataset::DataFrame;
use gradecast::record::InputRecord;
use gradecast::Result;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A random but valid student record covering every catalog field.
pub fn random_record(rng: &mut StdRng) -> InputRecord {
    let mut record = InputRecord::new();
    for field in &NUMERIC_FIELDS {
        record.insert(field.name, rng.gen_range(field.min..=field.max));
    }
    for field in &CATEGORICAL_FIELDS {
        let choice = &field.choices[rng.gen_range(0..field.choices.len())];
        record.insert(field.name, choice.value);
    }
    record
}

/// Student-shaped CSV text (`;`-separated, target `G3`) with `n_rows` rows.
pub fn student_csv(n_rows: usize, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut lines = Vec::with_capacity(n_rows + 1);

    let header: Vec<&str> = NUMERIC_FIELDS
        .iter()
        .map(|f| f.name)
        .chain(CATEGORICAL_FIELDS.iter().map(|f| f.name))
        .chain(["G3"])
        .collect();
    lines.push(header.join(";"));

    for _ in 0..n_rows {
        let record = random_record(&mut rng);
        let mut cells: Vec<String> = NUMERIC_FIELDS
            .iter()
            .map(|f| record.number(f.name).unwrap_or(0.0).to_string())
            .collect();
        cells.extend(
            CATEGORICAL_FIELDS
                .iter()
                .map(|f| record.label(f.name).unwrap_or_default().to_string()),
        );
        let g2 = record.number("G2").unwrap_or(0.0);
        let noise: f64 = rng.gen_range(-1.5..1.5);
        cells.push(format!("{:.1}", (g2 + noise).clamp(0.0, 20.0)));
        lines.push(cells.join(";"));
    }

    lines.join("\n")
}

/// Parsed [`student_csv`].
pub fn student_frame(n_rows: usize, seed: u64) -> Result<DataFrame> {
    DataFrame::from_reader(student_csv(n_rows, seed).as_bytes(), b';')
}

/// Random design matrix with a noiseless linear target.
pub fn linear_design(n_samples: usize, n_features: usize, seed: u64) -> (Array2<f64>, Array1<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let x = Array2::from_shape_fn((n_samples, n_features), |_| rng.gen_range(-1.0..1.0));
    let weights = Array1::from_shape_fn(n_features, |j| (j as f64 + 1.0) * 0.5);
    let y = x.dot(&weights) + 3.0;
    (x, y)
}
