pub mod chain;
pub mod claim;

pub use chain::*;
pub use claim::*;
