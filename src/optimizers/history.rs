use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Training,
    Validation,
}

impl Mode {
    /// Every epoch runs the training pass before the validation pass.
    pub const ORDER: [Mode; 2] = [Mode::Training, Mode::Validation];
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Training => write!(f, "training"),
            Mode::Validation => write!(f, "validation"),
        }
    }
}

/// Summed cross-entropy per epoch, one sequence per split. Entries are only
/// ever appended.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct LossHistory {
    training: Vec<f64>,
    validation: Vec<f64>,
}

impl LossHistory {
    pub fn new() -> LossHistory {
        LossHistory::default()
    }

    pub(crate) fn record(&mut self, mode: Mode, loss: f64) {
        match mode {
            Mode::Training => self.training.push(loss),
            Mode::Validation => self.validation.push(loss),
        }
    }

    pub fn training(&self) -> &[f64] {
        &self.training
    }

    pub fn validation(&self) -> &[f64] {
        &self.validation
    }

    pub fn get(&self, mode: Mode) -> &[f64] {
        match mode {
            Mode::Training => &self.training,
            Mode::Validation => &self.validation,
        }
    }

    pub fn epochs(&self) -> usize {
        self.training.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_appends_to_its_split() {
        let mut h = LossHistory::new();
        h.record(Mode::Training, 3.);
        h.record(Mode::Validation, 4.);
        h.record(Mode::Training, 2.);

        assert_eq!(h.training(), &[3., 2.]);
        assert_eq!(h.get(Mode::Validation), &[4.]);
        assert_eq!(h.epochs(), 2);
    }

    #[test]
    fn serializes_both_splits() {
        let mut h = LossHistory::new();
        h.record(Mode::Training, 1.5);
        h.record(Mode::Validation, 2.5);

        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, r#"{"training":[1.5],"validation":[2.5]}"#);
        assert_eq!(serde_json::from_str::<LossHistory>(&json).unwrap(), h);
    }
}
