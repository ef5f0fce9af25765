use crate::matrix::{Matrix, Scalar, scalar};

/// Base of the geometric progression of wavelengths.
const BASE: f64 = 10000.0;

/// Builds the sinusoidal position table of shape `[seq_len, embed_dim]`.
///
/// For position `p` and each even column `i`:
/// - `table[p][i] = sin(p / 10000^(i / embed_dim))`
/// - `table[p][i + 1] = cos(p / 10000^(i / embed_dim))`, when column `i + 1` exists.
///
/// The table depends only on its shape, so it is rebuilt on demand rather than stored.
pub fn positional_encoding<T: Scalar>(seq_len: usize, embed_dim: usize) -> Matrix<T> {
    let mut table = Matrix::zeros([seq_len, embed_dim]);
    let data = table.data_mut();

    for pos in 0..seq_len {
        let row = &mut data[pos * embed_dim..(pos + 1) * embed_dim];
        for i in (0..embed_dim).step_by(2) {
            let freq = BASE.powf(-(i as f64) / embed_dim as f64);
            let angle = pos as f64 * freq;
            row[i] = scalar(angle.sin());
            if i + 1 < embed_dim {
                row[i + 1] = scalar(angle.cos());
            }
        }
    }

    table
}
