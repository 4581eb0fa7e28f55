pub mod sim;
pub mod traits;

pub use sim::SimulatedVenue;
pub use traits::{ShareVenue, StrategyAdapter, WithdrawOutcome};

#[cfg(test)]
pub use traits::MockStrategyAdapter;
