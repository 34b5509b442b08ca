use ndarray::linalg::general_mat_mul;
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::activation::Activation;
use crate::error::Result;
use crate::f;

use super::forward::Trace;
use super::params::Params;

/// Which formula produces the hidden-layer gradient.
///
/// `Reference` multiplies the output distribution by the transposed output
/// weights after subtracting the true class's row from every row.
/// `Backprop` multiplies `(p - onehot(y))` by the transposed output weights.
/// Since `p` sums to one the two agree up to rounding.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradientRule {
    #[default]
    Reference,
    Backprop,
}

impl GradientRule {
    /// Gradient of the loss with respect to the hidden pre-activation.
    pub(crate) fn hidden_delta(&self, w2: ArrayView2<f64>, label: usize, trace: &Trace) -> Array1<f64> {
        let back = match self {
            GradientRule::Reference => {
                let shifted = &w2 - &w2.row(label);
                shifted.t().dot(&trace.output)
            }
            GradientRule::Backprop => {
                let delta = &trace.output - &f::onehot(label, trace.output.len());
                w2.t().dot(&delta)
            }
        };

        back * &trace.gate
    }
}

/// Summed gradients of one batch plus the summed log-likelihood of its
/// examples, both taken at the parameters the batch was evaluated at.
#[derive(Debug, Clone)]
pub struct BatchGradient {
    pub grads: Params,
    pub log_likelihood: f64,
    pub last_output: Option<Array1<f64>>,
}

/// Adds one example's gradient contribution into `acc`.
pub(crate) fn backward(
    params: &Params,
    x: ArrayView1<f64>,
    label: usize,
    trace: &Trace,
    rule: GradientRule,
    acc: &mut Params,
) {
    let delta_out = &trace.output - &f::onehot(label, trace.output.len());
    let delta_hidden = rule.hidden_delta(params.w2.view(), label, trace);

    acc.b2 += &delta_out;
    general_mat_mul(
        1.,
        &delta_out.view().insert_axis(Axis(1)),
        &trace.hidden.view().insert_axis(Axis(0)),
        1.,
        &mut acc.w2,
    );

    acc.b1 += &delta_hidden;
    general_mat_mul(
        1.,
        &delta_hidden.view().insert_axis(Axis(1)),
        &x.insert_axis(Axis(0)),
        1.,
        &mut acc.w1,
    );
}

/// Forward pass and gradient accumulation over every example of a batch.
/// Contributions are summed, not averaged.
pub fn accumulate(
    params: &Params,
    x: ArrayView2<f64>,
    y: &[usize],
    hidden: &dyn Activation,
    output: &dyn Activation,
    rule: GradientRule,
) -> Result<BatchGradient> {
    let mut grads = params.zeros_like();
    let mut log_likelihood = 0.;
    let mut last_output = None;

    for (row, &label) in x.outer_iter().zip(y.iter()) {
        let trace = params.forward(row, hidden, output)?;
        log_likelihood += f::log_likelihood(trace.output.view(), label)?;
        backward(params, row, label, &trace, rule, &mut grads);
        last_output = Some(trace.output);
    }

    Ok(BatchGradient {
        grads,
        log_likelihood,
        last_output,
    })
}
