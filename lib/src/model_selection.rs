//! Hold-out splitting.

use crate::error::{GradeError, Result};
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Output of [`train_test_split`].
#[derive(Clone, Debug)]
pub struct Split {
    pub x_train: Array2<f64>,
    pub x_test: Array2<f64>,
    pub y_train: Array1<f64>,
    pub y_test: Array1<f64>,
}

fn shuffle_indices(n_samples: usize, seed: Option<u64>) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n_samples).collect();
    match seed {
        Some(seed) => indices.shuffle(&mut StdRng::seed_from_u64(seed)),
        None => indices.shuffle(&mut rand::thread_rng()),
    }
    indices
}

/// Randomly partitions rows into a training and a test set.
///
/// The test set gets `ceil(n_samples * test_size)` rows. With a seed the
/// partition is reproducible.
///
/// # Errors
/// [`GradeError::Training`] when `test_size` is outside `(0, 1)`, the inputs
/// disagree on the number of rows, or either side would end up empty.
pub fn train_test_split(
    x: &Array2<f64>,
    y: &Array1<f64>,
    test_size: f64,
    seed: Option<u64>,
) -> Result<Split> {
    let n_samples = x.nrows();
    if n_samples != y.len() {
        return Err(GradeError::Training(format!(
            "x has {} rows but y has {} values",
            n_samples,
            y.len()
        )));
    }
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(GradeError::Training(format!(
            "test_size must be in (0, 1), got {}",
            test_size
        )));
    }

    let n_test = (n_samples as f64 * test_size).ceil() as usize;
    let n_train = n_samples.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(GradeError::Training(format!(
            "cannot split {} samples with test_size {}",
            n_samples, test_size
        )));
    }

    let indices = shuffle_indices(n_samples, seed);
    let (train, test) = indices.split_at(n_train);

    Ok(Split {
        x_train: x.select(Axis(0), train),
        x_test: x.select(Axis(0), test),
        y_train: y.select(Axis(0), train),
        y_test: y.select(Axis(0), test),
    })
}
