//! Seeded train/test split

use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::table::Table;

/// Split a table into train and test partitions at the given test fraction
///
/// The shuffle is driven by a fixed seed, so the same input and seed always
/// produce the same partition. Row counts satisfy
/// `train.n_rows() + test.n_rows() == table.n_rows()`.
///
/// Callers must have checked that `test_ratio` lies in the open interval
/// (0, 1); this function only rounds.
pub fn train_test_split(table: &Table, test_ratio: f64, seed: u64) -> (Table, Table) {
    let n = table.n_rows();
    let mut indices: Vec<usize> = (0..n).collect();

    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test_n = ((n as f64) * test_ratio).round() as usize;
    let test_n = test_n.min(n);

    let test = table.take_rows(&indices[..test_n]);
    let train = table.take_rows(&indices[test_n..]);
    (train, test)
}
