use approx::assert_abs_diff_eq;
use nagnet::f::batches;
use nagnet::nn::{Params, NO_DIGIT};
use nagnet::{Dataset, Error, GradientRule, Hyper, Network, Prediction};
use ndarray::{array, Array1, Array2};

fn toy_hyper() -> Hyper {
    Hyper {
        input_size: 4,
        hidden_size: 3,
        output_size: 3,
        learning_rate: 0.01,
        momentum: 0.5,
        batch_size: 2,
        epochs: 5,
        seed: Some(2024),
        ..Hyper::new()
    }
}

fn toy_splits() -> (Dataset, Dataset) {
    let train = (
        array![
            [1.0, 0.0, 0.5, -0.5],
            [0.0, 1.0, -0.5, 0.5],
            [0.5, 0.5, 1.0, 0.0],
            [0.9, 0.1, 0.4, -0.4]
        ],
        vec![0, 1, 2, 0],
    );
    let validation = (array![[0.8, 0.2, 0.5, -0.3], [0.1, 0.9, -0.4, 0.6]], vec![0, 1]);
    (train, validation)
}

#[test]
fn toy_run_records_every_epoch_and_improves() {
    let ((x, y), (xv, yv)) = toy_splits();
    let mut net = Network::new(toy_hyper()).unwrap();

    let history = net.training(&x, &y, &xv, &yv).unwrap();

    assert_eq!(history.training().len(), 5);
    assert_eq!(history.validation().len(), 5);
    for pair in history.training().windows(2) {
        assert!(pair[1] <= pair[0], "training loss rose: {:?}", history.training());
    }
    assert!(history.training()[4] < history.training()[0]);
    assert!(history.validation().iter().all(|l| l.is_finite() && *l > 0.));
}

#[test]
fn first_epoch_starts_near_uniform() {
    let ((x, y), (xv, yv)) = toy_splits();
    let mut net = Network::new(toy_hyper()).unwrap();

    let history = net
        .get_trainer()
        .set_epochs(1)
        .set_learning_rate(0.)
        .train(x.view(), &y, xv.view(), &yv)
        .unwrap();

    // tiny initial weights and zero biases give ~1/3 on every class
    assert_abs_diff_eq!(history.training()[0], 4. * 3f64.ln(), epsilon = 1e-3);
    assert_abs_diff_eq!(history.validation()[0], 2. * 3f64.ln(), epsilon = 1e-3);
}

#[test]
fn zero_epochs_yield_empty_histories() {
    let ((x, y), (xv, yv)) = toy_splits();
    let mut net = Network::new(toy_hyper()).unwrap();
    let before = net.params().clone();

    let history = net
        .get_trainer()
        .set_epochs(0)
        .train(x.view(), &y, xv.view(), &yv)
        .unwrap();

    assert!(history.training().is_empty());
    assert!(history.validation().is_empty());
    assert_eq!(net.params(), &before);
}

#[test]
fn empty_validation_split_costs_nothing() {
    let ((x, y), _) = toy_splits();
    let mut net = Network::new(toy_hyper()).unwrap();

    let history = net
        .training(&x, &y, &Array2::zeros((0, 4)), &[])
        .unwrap();

    assert_eq!(history.validation(), &[0.; 5]);
}

#[test]
fn gradient_rules_train_identically() {
    let ((x, y), (xv, yv)) = toy_splits();

    let mut reference = Network::new(toy_hyper()).unwrap();
    let mut backprop = Network::new(toy_hyper()).unwrap();
    backprop.set_gradient_rule(GradientRule::Backprop);

    let a = reference.training(&x, &y, &xv, &yv).unwrap();
    let b = backprop.training(&x, &y, &xv, &yv).unwrap();

    for (u, v) in a.training().iter().zip(b.training().iter()) {
        assert_abs_diff_eq!(u, v, epsilon = 1e-9);
    }
}

#[test]
fn bad_splits_fail_before_any_update() {
    let ((x, y), (xv, yv)) = toy_splits();
    let mut net = Network::new(toy_hyper()).unwrap();
    let before = net.params().clone();

    let wide = Array2::zeros((2, 5));
    assert!(matches!(
        net.training(&x, &y, &wide, &yv),
        Err(Error::Shape { expected: 4, found: 5 })
    ));
    assert!(matches!(
        net.training(&x, &y[..3], &xv, &yv),
        Err(Error::Misaligned { features: 4, labels: 3 })
    ));
    assert!(matches!(
        net.training(&x, &[0, 1, 2, 3], &xv, &yv),
        Err(Error::Label { label: 3, classes: 3 })
    ));
    assert!(matches!(
        net.get_trainer()
            .set_batch_size(0)
            .train(x.view(), &y, xv.view(), &yv),
        Err(Error::Config(_))
    ));
    assert_eq!(net.params(), &before);
}

#[test]
fn sentinel_peak_predicts_no_digit() {
    let mut b2 = Array1::zeros(11);
    b2[NO_DIGIT] = 3.;
    let params = Params::from_arrays(
        Array2::zeros((2, 4)),
        Array1::zeros(2),
        Array2::zeros((11, 2)),
        b2,
    )
    .unwrap();
    let net = Network::with_params(Hyper::sized(4, 2, 11), params).unwrap();

    let x = array![0.1, -0.2, 0.3, 0.0];
    assert_eq!(net.predict(x.view(), Some(7)).unwrap(), Prediction::NoDigit);
    assert_ne!(net.predict(x.view(), None).unwrap(), Prediction::Class(NO_DIGIT));
}

#[test]
fn batch_partition_of_nine_by_four() {
    let sizes = batches(9, 4).iter().map(|r| r.len()).collect::<Vec<_>>();
    assert_eq!(sizes, vec![4, 4, 1]);
}
