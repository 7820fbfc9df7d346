pub mod constants;
pub mod coordinates;
pub mod progress;

pub use constants::*;
pub use coordinates::{format_coordinate, parse_coordinate, wkt_point};
pub use progress::ProgressReporter;
