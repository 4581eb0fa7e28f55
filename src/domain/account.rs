use serde::{Deserialize, Serialize};

/// Lifetime totals for one depositor, in 6-decimal asset base units.
///
/// Created lazily on first deposit and never deleted. `withdrawn` counts the
/// net amounts actually paid out; the donated slice is tracked separately so
/// the donation policy can reason about cumulative realized value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Total assets ever deposited.
    pub deposited: u128,
    /// Total net assets ever paid back to the user.
    pub withdrawn: u128,
    /// Total assets ever routed to the donation buffer on this user's behalf.
    pub donated: u128,
}

impl UserAccount {
    /// Cumulative realized value: everything that has left the vault for this
    /// user, whether it reached their pocket or the donation buffer.
    pub fn realized(&self) -> u128 {
        self.withdrawn.saturating_add(self.donated)
    }

    /// Has this user realized more than they put in?
    pub fn in_profit(&self) -> bool {
        self.realized() > self.deposited
    }
}
