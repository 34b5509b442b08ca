use std::rc::Rc;

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

/// Element-wise or vector-wise transform applied to a layer's pre-activation.
///
/// `a` applies the transform, `d` returns its (diagonal) derivative at the
/// same point. For the rectifier the derivative doubles as the gate mask.
pub trait Activation {
    fn a(&self, x: ArrayView1<f64>) -> Array1<f64>;
    fn d(&self, x: ArrayView1<f64>) -> Array1<f64>;
}

pub struct Relu;

impl Relu {
    pub fn new() -> Rc<Relu> {
        Rc::new(Relu)
    }
}

impl Activation for Relu {
    fn a(&self, x: ArrayView1<f64>) -> Array1<f64> {
        x.mapv(|v| if v > 0. { v } else { 0. })
    }

    fn d(&self, x: ArrayView1<f64>) -> Array1<f64> {
        x.mapv(|v| if v > 0. { 1. } else { 0. })
    }
}

pub struct Identity;

impl Identity {
    pub fn new() -> Rc<Identity> {
        Rc::new(Identity)
    }
}

impl Activation for Identity {
    fn a(&self, x: ArrayView1<f64>) -> Array1<f64> {
        x.to_owned()
    }

    fn d(&self, x: ArrayView1<f64>) -> Array1<f64> {
        Array1::ones(x.len())
    }
}

/// Normalizing exponential. With `stable` set the maximum logit is
/// subtracted before exponentiating, which leaves the result unchanged but
/// keeps `exp` from overflowing on large logits.
pub struct Softmax {
    stable: bool,
}

impl Softmax {
    pub fn new(stable: bool) -> Rc<Softmax> {
        Rc::new(Softmax { stable })
    }
}

impl Activation for Softmax {
    fn a(&self, x: ArrayView1<f64>) -> Array1<f64> {
        let shift = if self.stable {
            x.fold(f64::NEG_INFINITY, |a, v| a.max(*v))
        } else {
            0.
        };

        let exps = x.mapv(|v| (v - shift).exp());
        let sum = exps.sum();
        exps / sum
    }

    fn d(&self, x: ArrayView1<f64>) -> Array1<f64> {
        self.a(x).mapv_into(|p| p * (1. - p))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activations {
    Relu,
    Identity,
    Softmax,
    RawSoftmax,
}

impl Activations {
    pub fn wake(&self) -> Rc<dyn Activation> {
        match self {
            Activations::Relu => Relu::new(),
            Activations::Identity => Identity::new(),
            Activations::Softmax => Softmax::new(true),
            Activations::RawSoftmax => Softmax::new(false),
        }
    }
}
