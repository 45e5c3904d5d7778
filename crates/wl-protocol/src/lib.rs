pub mod entry;
pub mod readings;

pub use entry::*;
pub use readings::*;
