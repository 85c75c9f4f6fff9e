pub mod aggregator;
pub mod dispatch;
pub mod guard;
pub mod sentinel;

#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) mod testing;

pub use aggregator::{Aggregator, CheckSet};
pub use sentinel::{QuickCycleOutcome, Sentinel};
