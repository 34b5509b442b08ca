use ndarray::{Array1, ArrayView1};

use crate::activation::Activation;
use crate::error::{Error, Result};

use super::params::Params;

/// Intermediates of one forward pass, handed straight to the gradient step.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    /// Hidden activation.
    pub hidden: Array1<f64>,
    /// Derivative of the hidden activation; 0/1 gate for the rectifier.
    pub gate: Array1<f64>,
    /// Output probabilities.
    pub output: Array1<f64>,
}

impl Params {
    pub fn forward(
        &self,
        x: ArrayView1<f64>,
        hidden: &dyn Activation,
        output: &dyn Activation,
    ) -> Result<Trace> {
        if x.len() != self.input_size() {
            return Err(Error::Shape {
                expected: self.input_size(),
                found: x.len(),
            });
        }

        let z1 = self.w1.dot(&x) + &self.b1;
        let h = hidden.a(z1.view());
        let gate = hidden.d(z1.view());
        let z2 = self.w2.dot(&h) + &self.b2;

        Ok(Trace {
            hidden: h,
            gate,
            output: output.a(z2.view()),
        })
    }
}
