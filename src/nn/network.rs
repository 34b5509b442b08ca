use log::{debug, trace};
use ndarray::{Array2, ArrayView1, ArrayView2};
use ndarray_stats::QuantileExt;
use rand::{rngs::StdRng, thread_rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::activation::Activations;
use crate::error::{Error, Result};
use crate::optimizers::{Hyper, LossHistory, NesterovMomentum};

use super::forward::Trace;
use super::gradient::GradientRule;
use super::params::Params;

/// Output class absorbing "no digit" examples in the 11-class layout.
pub const NO_DIGIT: usize = 10;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prediction {
    Class(usize),
    NoDigit,
}

/// Two dense layers, rectifier then normalizing exponential. Owns its
/// parameters and the optimizer velocity.
#[derive(Debug, Clone)]
pub struct Network {
    pub(crate) hyper: Hyper,
    pub(crate) params: Params,
    pub(crate) velocity: Params,
    pub(crate) hidden_activation: Activations,
    pub(crate) output_activation: Activations,
    pub(crate) gradient_rule: GradientRule,
}

impl Network {
    pub fn new(hyper: Hyper) -> Result<Network> {
        hyper.validate()?;

        let params = match hyper.seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                Params::random(
                    hyper.input_size,
                    hyper.hidden_size,
                    hyper.output_size,
                    hyper.init_range,
                    &mut rng,
                )
            }
            None => Params::random(
                hyper.input_size,
                hyper.hidden_size,
                hyper.output_size,
                hyper.init_range,
                &mut thread_rng(),
            ),
        };

        Network::with_params(hyper, params)
    }

    pub fn with_params(hyper: Hyper, params: Params) -> Result<Network> {
        hyper.validate()?;

        let dims = (params.input_size(), params.hidden_size(), params.output_size());
        if dims != (hyper.input_size, hyper.hidden_size, hyper.output_size) {
            return Err(Error::Config(format!(
                "parameters are {dims:?}, configuration expects ({}, {}, {})",
                hyper.input_size, hyper.hidden_size, hyper.output_size
            )));
        }

        Ok(Network {
            velocity: params.zeros_like(),
            params,
            hyper,
            hidden_activation: Activations::Relu,
            output_activation: Activations::Softmax,
            gradient_rule: GradientRule::Reference,
        })
    }

    /// The hidden gradient treats `d` as an element-wise gate, so only
    /// element-wise activations are accepted here.
    pub fn set_hidden_activation(&mut self, activation: Activations) -> Result<&mut Self> {
        match activation {
            Activations::Relu | Activations::Identity => {
                self.hidden_activation = activation;
                Ok(self)
            }
            other => Err(Error::Config(format!(
                "{other:?} is not an element-wise hidden activation"
            ))),
        }
    }

    /// The output gradient is `p - onehot(y)`, which holds only for a
    /// normalizing exponential under cross-entropy.
    pub fn set_output_activation(&mut self, activation: Activations) -> Result<&mut Self> {
        match activation {
            Activations::Softmax | Activations::RawSoftmax => {
                self.output_activation = activation;
                Ok(self)
            }
            other => Err(Error::Config(format!(
                "{other:?} cannot feed a cross-entropy output layer"
            ))),
        }
    }

    pub fn set_gradient_rule(&mut self, rule: GradientRule) -> &mut Self {
        self.gradient_rule = rule;
        self
    }

    pub fn hyper(&self) -> &Hyper {
        &self.hyper
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn velocity(&self) -> &Params {
        &self.velocity
    }

    pub(crate) fn reset_velocity(&mut self) {
        self.velocity.fill(0.);
        trace!("velocity reset");
    }

    pub fn get_trainer(&mut self) -> NesterovMomentum<'_> {
        NesterovMomentum::new(self)
    }

    /// Trains with the configured schedule and returns both loss histories.
    pub fn training(
        &mut self,
        x: &Array2<f64>,
        y: &[usize],
        x_val: &Array2<f64>,
        y_val: &[usize],
    ) -> Result<LossHistory> {
        self.get_trainer()
            .train(x.view(), y, x_val.view(), y_val)
    }

    pub fn forward(&self, x: ArrayView1<f64>) -> Result<Trace> {
        let hidden = self.hidden_activation.wake();
        let output = self.output_activation.wake();
        self.params.forward(x, &*hidden, &*output)
    }

    fn classify(&self, x: ArrayView1<f64>) -> Result<usize> {
        let trace = self.forward(x)?;
        trace.output.argmax().map_err(|_| Error::NonFinite {
            what: "output distribution",
        })
    }

    /// Most probable class. `label` is only echoed to the debug log.
    pub fn predict(&self, x: ArrayView1<f64>, label: Option<usize>) -> Result<Prediction> {
        let class = self.classify(x)?;

        let prediction = if class == NO_DIGIT && self.hyper.output_size == NO_DIGIT + 1 {
            Prediction::NoDigit
        } else {
            Prediction::Class(class)
        };

        if let Some(label) = label {
            debug!("true class: {label}, predicted: {prediction:?}");
        }

        Ok(prediction)
    }

    /// Fraction of rows whose most probable class equals the label.
    pub fn accuracy(&self, x: ArrayView2<f64>, y: &[usize]) -> Result<f64> {
        self.check_split(x, y)?;
        if y.is_empty() {
            return Err(Error::Empty("accuracy needs at least one example"));
        }

        let mut correct = 0;
        for (row, &label) in x.outer_iter().zip(y.iter()) {
            if self.classify(row)? == label {
                correct += 1;
            }
        }

        Ok(correct as f64 / y.len() as f64)
    }

    /// Rejects a split whose rows, labels or label values don't fit this
    /// network.
    pub fn check_split(&self, x: ArrayView2<f64>, y: &[usize]) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(Error::Misaligned {
                features: x.nrows(),
                labels: y.len(),
            });
        }
        if x.nrows() > 0 && x.ncols() != self.hyper.input_size {
            return Err(Error::Shape {
                expected: self.hyper.input_size,
                found: x.ncols(),
            });
        }
        if let Some(&label) = y.iter().find(|l| **l >= self.hyper.output_size) {
            return Err(Error::Label {
                label,
                classes: self.hyper.output_size,
            });
        }
        Ok(())
    }
}
