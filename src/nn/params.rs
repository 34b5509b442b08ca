use ndarray::{Array1, Array2};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Weights and biases of the two dense layers.
///
/// `w1` is `[hidden × input]`, `w2` is `[output × hidden]`. The same four
/// tensor layout carries gradients and optimizer velocity, so those are
/// `Params` too.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Params {
    pub w1: Array2<f64>,
    pub b1: Array1<f64>,
    pub w2: Array2<f64>,
    pub b2: Array1<f64>,
}

impl Params {
    pub fn zeros(d_in: usize, d_hidden: usize, d_out: usize) -> Params {
        Params {
            w1: Array2::zeros((d_hidden, d_in)),
            b1: Array1::zeros(d_hidden),
            w2: Array2::zeros((d_out, d_hidden)),
            b2: Array1::zeros(d_out),
        }
    }

    /// Weights drawn uniformly from `(-range, range)`, biases zero.
    pub fn random<R: Rng>(
        d_in: usize,
        d_hidden: usize,
        d_out: usize,
        range: f64,
        rng: &mut R,
    ) -> Params {
        let dist = Uniform::new(-range, range);
        Params {
            w1: Array2::random_using((d_hidden, d_in), dist, rng),
            b1: Array1::zeros(d_hidden),
            w2: Array2::random_using((d_out, d_hidden), dist, rng),
            b2: Array1::zeros(d_out),
        }
    }

    pub fn from_arrays(
        w1: Array2<f64>,
        b1: Array1<f64>,
        w2: Array2<f64>,
        b2: Array1<f64>,
    ) -> Result<Params> {
        if b1.len() != w1.nrows() {
            return Err(Error::Config(format!(
                "hidden bias has length {}, hidden weights have {} rows",
                b1.len(),
                w1.nrows()
            )));
        }
        if w2.ncols() != w1.nrows() {
            return Err(Error::Config(format!(
                "output weights take {} hidden units, hidden layer has {}",
                w2.ncols(),
                w1.nrows()
            )));
        }
        if b2.len() != w2.nrows() {
            return Err(Error::Config(format!(
                "output bias has length {}, output weights have {} rows",
                b2.len(),
                w2.nrows()
            )));
        }

        Ok(Params { w1, b1, w2, b2 })
    }

    pub fn input_size(&self) -> usize {
        self.w1.ncols()
    }

    pub fn hidden_size(&self) -> usize {
        self.w1.nrows()
    }

    pub fn output_size(&self) -> usize {
        self.w2.nrows()
    }

    pub fn zeros_like(&self) -> Params {
        Params::zeros(self.input_size(), self.hidden_size(), self.output_size())
    }

    pub fn scale(&self, k: f64) -> Params {
        Params {
            w1: &self.w1 * k,
            b1: &self.b1 * k,
            w2: &self.w2 * k,
            b2: &self.b2 * k,
        }
    }

    /// `self += k * other`
    pub fn add_scaled(&mut self, k: f64, other: &Params) {
        self.w1.scaled_add(k, &other.w1);
        self.b1.scaled_add(k, &other.b1);
        self.w2.scaled_add(k, &other.w2);
        self.b2.scaled_add(k, &other.b2);
    }

    pub fn fill(&mut self, v: f64) {
        self.w1.fill(v);
        self.b1.fill(v);
        self.w2.fill(v);
        self.b2.fill(v);
    }

    pub fn is_zero(&self) -> bool {
        self.iter().all(|v| *v == 0.)
    }

    pub fn is_finite(&self) -> bool {
        self.iter().all(|v| v.is_finite())
    }

    /// Frobenius norm of each tensor, in `w1, b1, w2, b2` order.
    pub fn norms(&self) -> [f64; 4] {
        let norm = |s: f64| s.sqrt();
        [
            norm(self.w1.iter().map(|v| v * v).sum()),
            norm(self.b1.iter().map(|v| v * v).sum()),
            norm(self.w2.iter().map(|v| v * v).sum()),
            norm(self.b2.iter().map(|v| v * v).sum()),
        ]
    }

    fn iter(&self) -> impl Iterator<Item = &f64> {
        self.w1
            .iter()
            .chain(self.b1.iter())
            .chain(self.w2.iter())
            .chain(self.b2.iter())
    }
}
