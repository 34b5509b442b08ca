use thiserror::Error;

use crate::optimizers::Mode;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("feature vector has length {found}, network expects {expected}")]
    Shape { expected: usize, found: usize },

    #[error("{features} feature vectors but {labels} labels")]
    Misaligned { features: usize, labels: usize },

    #[error("label {label} is outside [0, {classes})")]
    Label { label: usize, classes: usize },

    #[error("non-finite value in {what}")]
    NonFinite { what: &'static str },

    #[error("empty input: {0}")]
    Empty(&'static str),

    #[error("epoch {epoch}, {mode} pass, batch {batch}: {source}")]
    Training {
        epoch: usize,
        mode: Mode,
        batch: usize,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub(crate) fn at(self, epoch: usize, mode: Mode, batch: usize) -> Error {
        Error::Training {
            epoch,
            mode,
            batch,
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
