pub mod adapter;

pub use adapter::{BridgeAdapter, BridgeStrategy};
