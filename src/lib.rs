pub mod bank;
pub mod bridge;
pub mod cli;
pub mod codec;
pub mod config;
pub mod domain;
pub mod error;
pub mod numeric;
pub mod vault;
pub mod venue;

pub use bank::AssetBank;
pub use bridge::{BridgeAdapter, BridgeStrategy};
pub use codec::{ActionPayload, ACTION_ID_VAULT_TRANSFER, ACTION_VERSION, ENCODED_LEN};
pub use config::AppConfig;
pub use domain::{QueuedWithdrawal, UserAccount, VaultEvent, WithdrawalState};
pub use error::{BridgeError, CodecError, GivepoolError, Result, VaultError};
pub use numeric::SHARE_SCALAR;
pub use vault::{donation_for, DonationTerms, Settlement, Vault};
pub use venue::{ShareVenue, SimulatedVenue, StrategyAdapter, WithdrawOutcome};
