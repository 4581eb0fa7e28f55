pub mod account;
pub mod events;
pub mod withdrawal;

pub use account::UserAccount;
pub use events::VaultEvent;
pub use withdrawal::{QueuedWithdrawal, WithdrawalState};
