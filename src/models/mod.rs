pub mod price;
pub mod stats;

pub use price::*;
pub use stats::*;
