use decoder_rs::matrix::{Matrix, softmax_row};
use decoder_rs::nn::{dropout, layer_norm, positional_encoding, self_attention};
use decoder_rs::random::StdRandom;
use decoder_rs::{DecoderError, RandomSource, matrix};

fn random_rows(rows: usize, cols: usize, seed: u64) -> Matrix<f64> {
    let mut rng = StdRandom::seeded(seed);
    let data = (0..rows * cols).map(|_| rng.uniform() * 3.0).collect();
    Matrix::new(data, [rows, cols]).unwrap()
}

#[test]
fn test_matmul_rejects_mismatched_inner_dimension() {
    let a = Matrix::<f64>::zeros([2, 3]);
    let b = Matrix::<f64>::zeros([2, 2]);

    let err = a.matmul(&b).unwrap_err();
    assert!(matches!(err, DecoderError::DimensionMismatch { op: "matmul", .. }));
}

#[test]
fn test_transpose_twice_is_identity() {
    let m = random_rows(7, 3, 1);
    assert_eq!(m.transpose().unwrap().transpose().unwrap(), m);
}

#[test]
fn test_matmul_with_transpose() {
    // (A · B)ᵀ == Bᵀ · Aᵀ
    let a = random_rows(4, 3, 2);
    let b = random_rows(3, 5, 3);

    let left = a.matmul(&b).unwrap().transpose().unwrap();
    let right = b
        .transpose()
        .unwrap()
        .matmul(&a.transpose().unwrap())
        .unwrap();
    for (x, y) in left.data().iter().zip(right.data().iter()) {
        assert!((x - y).abs() < 1e-12);
    }
}

#[test]
fn test_softmax_is_shift_invariant() {
    let base = random_rows(1, 9, 4);
    let mut a = base.row(0).to_vec();
    let mut b: Vec<f64> = a.iter().map(|x| x - 123.0).collect();

    softmax_row(&mut a);
    softmax_row(&mut b);

    for (x, y) in a.iter().zip(b.iter()) {
        assert!((x - y).abs() < 1e-12);
    }
    assert!((a.iter().sum::<f64>() - 1.0).abs() < 1e-12);
}

#[test]
fn test_layer_norm_statistics() {
    let m = random_rows(5, 32, 5);
    let out = layer_norm(&m, 1e-5);

    for row in out.iter_rows() {
        let mean = row.iter().sum::<f64>() / 32.0;
        let var = row.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / 32.0;
        assert!(mean.abs() < 1e-9);
        assert!((var - 1.0).abs() < 1e-3);
    }
}

#[test]
fn test_positional_table_first_row() {
    let table = positional_encoding::<f64>(2, 4);
    assert_eq!(table.row(0), &[0.0, 1.0, 0.0, 1.0]);
}

#[test]
fn test_positional_add_shape_mismatch() {
    let hidden = Matrix::<f64>::zeros([3, 4]);
    let table = positional_encoding::<f64>(2, 4);
    assert!(matches!(
        &hidden + &table,
        Err(DecoderError::DimensionMismatch { op: "add", .. })
    ));
}

#[test]
fn test_attention_causality() {
    let q = random_rows(6, 8, 6);
    let v = random_rows(6, 8, 7);
    let base = self_attention(&q, &q, &v, 4).unwrap();

    // Perturb V rows 3.. and check rows 0..=2 are unchanged.
    let mut perturbed = v.clone();
    for x in &mut perturbed.data_mut()[3 * 8..] {
        *x += 10.0;
    }
    let out = self_attention(&q, &q, &perturbed, 4).unwrap();

    for i in 0..3 {
        assert_eq!(base.row(i), out.row(i));
    }
    assert_ne!(base.row(5), out.row(5));
}

#[test]
fn test_dropout_zero_is_identity() {
    let m = matrix!([1.0, 2.0, 3.0, 4.0], [2, 2]);
    let mut rng = StdRandom::seeded(0);
    assert_eq!(dropout(&m, 0.0, &mut rng).unwrap(), m);
}
