pub mod series;
pub mod window;

pub use series::generate_synthetic_series;
pub use window::{prepare_windows, WindowedDataset};
