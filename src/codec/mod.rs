pub mod action;

pub use action::{ActionPayload, ACTION_ID_VAULT_TRANSFER, ACTION_VERSION, ENCODED_LEN};
