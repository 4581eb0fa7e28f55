use alloy::primitives::Address;
use thiserror::Error;

/// Main error type for the giving vault
#[derive(Error, Debug)]
pub enum GivepoolError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Ledger errors
    #[error("Vault error: {0}")]
    Vault(#[from] VaultError),

    // Settlement errors
    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    // Wire format errors
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    // External venue errors
    #[error("External venue error: {0}")]
    Venue(String),

    // Asset ledger errors
    #[error("Insufficient balance for {account}: requested {requested}, available {available}")]
    InsufficientBalance {
        account: Address,
        requested: u128,
        available: u128,
    },

    #[error("Arithmetic overflow: {0}")]
    Overflow(String),

    // Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for GivepoolError
pub type Result<T> = std::result::Result<T, GivepoolError>;

/// Specific error types for the share ledger
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    #[error("Deposit amount is zero")]
    ZeroAssets,

    #[error("Share amount is zero")]
    ZeroShares,

    #[error("Deposit of {amount} is too small to mint shares at the current price")]
    DepositTooSmall { amount: u128 },

    #[error("Invalid receiver: {addr}")]
    InvalidReceiver { addr: Address },

    #[error("Insufficient shares: requested {requested}, available {available}")]
    InsufficientShares { requested: u128, available: u128 },

    #[error("Withdrawal already pending for {user}")]
    WithdrawalPending { user: Address },

    #[error("No pending withdrawal for {user}")]
    NoPendingWithdrawal { user: Address },

    #[error("Venue still illiquid for queued withdrawal of {assets}")]
    StillIlliquid { assets: u128 },

    #[error("Caller {caller} is not the vault owner")]
    NotAuthorized { caller: Address },

    #[error("Donation rate {bps} bps exceeds ceiling {ceiling} bps")]
    DonationBpsTooHigh { bps: u16, ceiling: u16 },
}

/// Specific error types for the bridge settlement layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error("Caller {caller} is not an authorized strategy")]
    NotAuthorized { caller: Address },

    #[error("Zero address")]
    ZeroAddress,

    #[error("Asset amount is zero")]
    ZeroAssets,

    #[error("Amount {assets} exceeds the 64-bit settlement encoding range")]
    AmountTooLarge { assets: u128 },

    #[error("Insufficient assets: requested {requested}, received {received}")]
    InsufficientAssets { requested: u128, received: u128 },
}

/// Specific error types for the action payload wire format
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Unsupported payload version: {found:#04x}")]
    UnsupportedVersion { found: u8 },

    #[error("Unknown action id: {found:#08x}")]
    UnknownActionId { found: u32 },

    #[error("Invalid payload length: expected {expected}, found {found}")]
    InvalidLength { expected: usize, found: usize },

    #[error("Malformed payload body: {0}")]
    Body(String),
}
