mod forward;
pub mod gradient;
mod network;
mod params;

pub use forward::Trace;
pub use gradient::GradientRule;
pub use network::{Network, Prediction, NO_DIGIT};
pub use params::Params;
