use log::{debug, log, trace, Level};
use ndarray::{s, ArrayView2};

use super::history::{LossHistory, Mode};
use crate::error::{Error, Result};
use crate::f;
use crate::nn::gradient::{self, BatchGradient};
use crate::nn::{Network, Params};

/// Result of one look-ahead update.
#[derive(Debug, Clone)]
pub struct Step {
    pub params: Params,
    pub velocity: Params,
    pub batch: BatchGradient,
}

/// One Nesterov momentum update.
///
/// `eval` receives the look-ahead point `params - momentum * velocity` and
/// returns the batch gradient taken there. The new velocity is
/// `momentum * velocity + learning_rate * grad` and the new parameters are
/// `params - new_velocity`. Neither input is modified.
pub fn nesterov_step<F>(
    params: &Params,
    velocity: &Params,
    learning_rate: f64,
    momentum: f64,
    eval: F,
) -> Result<Step>
where
    F: FnOnce(&Params) -> Result<BatchGradient>,
{
    let look_ahead = velocity.scale(momentum);

    let mut probe = params.clone();
    probe.add_scaled(-1., &look_ahead);

    let batch = eval(&probe)?;

    let mut new_velocity = look_ahead;
    new_velocity.add_scaled(learning_rate, &batch.grads);

    let mut new_params = params.clone();
    new_params.add_scaled(-1., &new_velocity);

    if !new_params.is_finite() {
        return Err(Error::NonFinite {
            what: "updated parameters",
        });
    }

    Ok(Step {
        params: new_params,
        velocity: new_velocity,
        batch,
    })
}

/// Mini-batch trainer driving a [`Network`] through interleaved training and
/// validation passes.
pub struct NesterovMomentum<'a> {
    net: &'a mut Network,
    verbose: bool,
    pub losses: LossHistory,
}

impl NesterovMomentum<'_> {
    pub fn new(net: &mut Network) -> NesterovMomentum<'_> {
        NesterovMomentum {
            net,
            verbose: false,
            losses: LossHistory::new(),
        }
    }

    pub fn verbose(&mut self) -> &mut Self {
        self.verbose = true;
        self
    }

    pub fn set_learning_rate(&mut self, rate: f64) -> &mut Self {
        self.net.hyper.learning_rate = rate;
        self
    }

    pub fn set_momentum(&mut self, momentum: f64) -> &mut Self {
        self.net.hyper.momentum = momentum;
        self
    }

    pub fn set_batch_size(&mut self, batch_size: usize) -> &mut Self {
        self.net.hyper.batch_size = batch_size;
        self
    }

    pub fn set_epochs(&mut self, epochs: usize) -> &mut Self {
        self.net.hyper.epochs = epochs;
        self
    }

    /// Runs every configured epoch and returns the per-epoch losses of both
    /// splits. Any failure aborts the whole run.
    pub fn train(
        &mut self,
        x: ArrayView2<f64>,
        y: &[usize],
        x_val: ArrayView2<f64>,
        y_val: &[usize],
    ) -> Result<LossHistory> {
        self.net.hyper.validate()?;
        self.net.check_split(x, y)?;
        self.net.check_split(x_val, y_val)?;

        self.losses = LossHistory::new();
        let epochs = self.net.hyper.epochs;
        let level = if self.verbose { Level::Info } else { Level::Debug };

        for epoch in 0..epochs {
            for mode in Mode::ORDER {
                let loss = match mode {
                    Mode::Training => self.training_pass(epoch, x, y)?,
                    Mode::Validation => self.validation_pass(epoch, x_val, y_val)?,
                };
                self.losses.record(mode, loss);
            }

            log!(
                level,
                "({}/{}) training loss = {}, validation loss = {}",
                epoch + 1,
                epochs,
                self.losses.training()[epoch],
                self.losses.validation()[epoch]
            );

            if epoch % 10 == 0 {
                let [w1, b1, w2, b2] = self.net.params.norms();
                trace!("epoch {epoch}: |w1| = {w1}, |b1| = {b1}, |w2| = {w2}, |b2| = {b2}");
            }
        }

        Ok(self.losses.clone())
    }

    fn training_pass(&mut self, epoch: usize, x: ArrayView2<f64>, y: &[usize]) -> Result<f64> {
        self.net.reset_velocity();

        let hyper = self.net.hyper.clone();
        let hidden = self.net.hidden_activation.wake();
        let output = self.net.output_activation.wake();
        let rule = self.net.gradient_rule;

        let mut loss = 0.;
        let mut last_output = None;

        for (i, range) in f::batches(y.len(), hyper.batch_size).into_iter().enumerate() {
            let xb = x.slice(s![range.clone(), ..]);
            let yb = &y[range];

            let step = nesterov_step(
                &self.net.params,
                &self.net.velocity,
                hyper.learning_rate,
                hyper.momentum,
                |probe| gradient::accumulate(probe, xb, yb, &*hidden, &*output, rule),
            )
            .map_err(|e| e.at(epoch, Mode::Training, i))?;

            loss -= step.batch.log_likelihood;
            last_output = step.batch.last_output.or(last_output);
            self.net.params = step.params;
            self.net.velocity = step.velocity;
        }

        if let Some(output) = last_output {
            debug!("epoch {epoch}: last training output = {output}");
        }

        Ok(loss)
    }

    fn validation_pass(&self, epoch: usize, x: ArrayView2<f64>, y: &[usize]) -> Result<f64> {
        let hidden = self.net.hidden_activation.wake();
        let output = self.net.output_activation.wake();

        let mut loss = 0.;

        for (i, range) in f::batches(y.len(), self.net.hyper.batch_size)
            .into_iter()
            .enumerate()
        {
            let xb = x.slice(s![range.clone(), ..]);
            let yb = &y[range];

            for (row, &label) in xb.outer_iter().zip(yb.iter()) {
                let ll = self
                    .net
                    .params
                    .forward(row, &*hidden, &*output)
                    .and_then(|t| f::log_likelihood(t.output.view(), label))
                    .map_err(|e| e.at(epoch, Mode::Validation, i))?;
                loss -= ll;
            }
        }

        Ok(loss)
    }
}
