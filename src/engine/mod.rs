pub mod pipeline;
pub mod results;

pub use pipeline::*;
