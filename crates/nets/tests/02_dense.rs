mod common;

use common::cpu_backend;
use nets::{Dense, NetError, Tensor};

#[test]
fn dense_forward_exact() {
    let backend = cpu_backend();
    // [in = 4, out = 2], row-major
    let w = vec![
        1.0, 0.2, //
        0.5, 0.3, //
        -0.5, 0.1, //
        -1.0, 0.9,
    ];
    let b = vec![0.1, -0.2];
    let layer = Dense::new(w, b.clone(), 4, 2).unwrap();
    let x = Tensor::from_vec(vec![1, 4], vec![1.0, 2.0, 3.0, 4.0]);
    let y = layer.forward(&x, backend.as_ref()).unwrap();

    let expected_y0 = 1.0 * 1.0 + 0.5 * 2.0 - 0.5 * 3.0 - 1.0 * 4.0 + b[0];
    let expected_y1 = 0.2 * 1.0 + 0.3 * 2.0 + 0.1 * 3.0 + 0.9 * 4.0 + b[1];

    assert_eq!(y.shape, vec![1, 2]);
    assert!((y.data()[0] - expected_y0).abs() < 1e-6);
    assert!((y.data()[1] - expected_y1).abs() < 1e-6);
}

#[test]
fn dense_bias_only() {
    let backend = cpu_backend();
    let dense = Dense::new(vec![0.0; 6], vec![0.5, -0.5], 3, 2).unwrap();
    let x = Tensor::from_vec(vec![2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let y = dense.forward(&x, backend.as_ref()).unwrap();
    assert_eq!(y.data, vec![0.5, -0.5, 0.5, -0.5]);
}

#[test]
fn dense_rejects_mismatched_buffers() {
    assert!(matches!(
        Dense::new(vec![0.0; 5], vec![0.0; 2], 3, 2),
        Err(NetError::ShapeMismatch { .. })
    ));
    assert!(matches!(
        Dense::new(vec![0.0; 6], vec![0.0; 3], 3, 2),
        Err(NetError::ShapeMismatch { .. })
    ));
}

#[test]
fn dense_glorot_init_stats() {
    let rng = fastrand::Rng::with_seed(42);
    let dense = Dense::random(40, 30, &rng);
    assert_eq!(dense.w.shape, vec![40, 30]);
    assert_eq!(dense.b.shape, vec![30]);
    assert!(dense.b.data.iter().all(|&v| v == 0.0));

    let limit = (6.0f32 / (40.0 + 30.0)).sqrt();
    assert!(dense.w.data.iter().all(|w| w.abs() <= limit));

    let n = dense.w.data.len() as f32;
    let mean: f32 = dense.w.data.iter().sum::<f32>() / n;
    assert!(mean.abs() < 0.05);
    let var: f32 = dense.w.data.iter().map(|&x| (x - mean).powi(2)).sum::<f32>() / n;
    let expected_var = limit * limit / 3.0;
    assert!((var - expected_var).abs() / expected_var < 0.2);
}
