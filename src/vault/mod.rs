pub mod donation;
pub mod ledger;

pub use donation::{donation_for, DonationTerms};
pub use ledger::{Settlement, Vault};
