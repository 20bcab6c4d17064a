pub mod catalog;
pub mod history;
pub mod preferences;

pub use catalog::*;
pub use history::*;
pub use preferences::*;
