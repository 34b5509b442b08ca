mod history;
mod nesterov;
mod optimizer;

pub use history::{LossHistory, Mode};
pub use nesterov::{nesterov_step, NesterovMomentum, Step};
pub use optimizer::Hyper;
