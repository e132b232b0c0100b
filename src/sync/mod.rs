mod balance;
mod report;
mod transactions;

pub use balance::*;
pub use report::*;
pub use transactions::*;

#[cfg(test)]
pub(crate) mod fake;
