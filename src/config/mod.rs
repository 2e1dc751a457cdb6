pub mod run;
pub mod profile;

pub use run::*;
pub use profile::*;
