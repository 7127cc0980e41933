pub mod axes;
pub mod pid;

pub use axes::AxisControllers;
pub use pid::{Pid, PidGains, PidState};
