mod activation;
pub mod error;
pub mod f;
pub mod nn;
pub mod optimizers;

pub use activation::{Activation, Activations};
pub use error::{Error, Result};
pub use nn::{GradientRule, Network, Prediction};
pub use optimizers::{Hyper, LossHistory, Mode};

/// Feature rows and their integer class labels.
pub type Dataset = (ndarray::Array2<f64>, Vec<usize>);
