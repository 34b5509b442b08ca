use ndarray::ArrayView1;

use crate::error::{Error, Result};

/// Log of the probability assigned to `label`. Fails when the probability
/// is zero, negative or not a number, since its logarithm is undefined.
pub fn log_likelihood(probs: ArrayView1<f64>, label: usize) -> Result<f64> {
    let p = *probs.get(label).ok_or(Error::Label {
        label,
        classes: probs.len(),
    })?;

    let ll = p.ln();
    if !ll.is_finite() {
        return Err(Error::NonFinite {
            what: "log-probability of the true class",
        });
    }

    Ok(ll)
}

/// Categorical cross-entropy against a one-hot target.
pub fn cross_entropy(probs: ArrayView1<f64>, label: usize) -> Result<f64> {
    Ok(-log_likelihood(probs, label)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn cross_entropy_of_true_class() {
        let p = array![0.25, 0.5, 0.25];
        assert_abs_diff_eq!(cross_entropy(p.view(), 1).unwrap(), 2f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn zero_probability_is_fatal() {
        let p = array![1., 0.];
        assert!(matches!(
            cross_entropy(p.view(), 1),
            Err(Error::NonFinite { .. })
        ));
    }

    #[test]
    fn nan_probability_is_fatal() {
        let p = array![f64::NAN, f64::NAN];
        assert!(cross_entropy(p.view(), 0).is_err());
    }

    #[test]
    fn label_outside_distribution() {
        let p = array![0.5, 0.5];
        assert!(matches!(
            log_likelihood(p.view(), 2),
            Err(Error::Label { label: 2, classes: 2 })
        ));
    }
}
