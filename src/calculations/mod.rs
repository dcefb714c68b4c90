pub mod backward_pass;
pub mod forward_pass;

pub use backward_pass::{BackwardPass, LateTimes};
pub use forward_pass::{EarlyTimes, ForwardPass};
