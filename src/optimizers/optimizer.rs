use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Everything fixed at construction: layer sizes, optimizer scalars, the
/// batch/epoch schedule and the weight initialization.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Hyper {
    pub input_size: usize,
    pub hidden_size: usize,
    pub output_size: usize,
    pub learning_rate: f64,
    pub momentum: f64,
    pub batch_size: usize,
    pub epochs: usize,
    pub init_range: f64,
    pub seed: Option<u64>,
}

impl Hyper {
    /// 28x28 digit images, 128 hidden units, ten digits plus a "no digit" class.
    pub fn new() -> Hyper {
        Hyper {
            input_size: 784,
            hidden_size: 128,
            output_size: 11,
            learning_rate: 0.0001,
            momentum: 0.9,
            batch_size: 40,
            epochs: 100,
            init_range: 0.0001,
            seed: None,
        }
    }

    pub fn sized(input_size: usize, hidden_size: usize, output_size: usize) -> Hyper {
        Hyper {
            input_size,
            hidden_size,
            output_size,
            ..Hyper::new()
        }
    }

    pub fn from_json(json: &str) -> Result<Hyper> {
        let hyper: Hyper =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        hyper.validate()?;
        Ok(hyper)
    }

    pub fn validate(&self) -> Result<()> {
        if self.input_size == 0 || self.hidden_size == 0 || self.output_size == 0 {
            return Err(Error::Config("layer sizes must be non-zero".to_owned()));
        }
        if self.batch_size == 0 {
            return Err(Error::Config("batch size must be non-zero".to_owned()));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate >= 0.) {
            return Err(Error::Config(format!(
                "learning rate {} must be finite and non-negative",
                self.learning_rate
            )));
        }
        if !(0. ..1.).contains(&self.momentum) {
            return Err(Error::Config(format!(
                "momentum {} must lie in [0, 1)",
                self.momentum
            )));
        }
        if !((2. * self.init_range).is_finite() && self.init_range > 0.) {
            return Err(Error::Config(format!(
                "init range {} must be positive and small enough that twice it is finite",
                self.init_range
            )));
        }
        Ok(())
    }
}

impl Default for Hyper {
    fn default() -> Hyper {
        Hyper::new()
    }
}
