//! Player purse backed by a single balance.

use crate::Purse;

/// Currency held by the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Wallet {
    balance: u32,
}

impl Wallet {
    /// Creates a wallet holding the provided balance.
    #[must_use]
    pub const fn new(balance: u32) -> Self {
        Self { balance }
    }

    /// Adds currency, saturating at the numeric limit.
    pub fn earn(&mut self, amount: u32) {
        self.balance = self.balance.saturating_add(amount);
    }
}

impl Purse for Wallet {
    fn balance(&self) -> u32 {
        self.balance
    }

    fn decrease_money(&mut self, amount: u32) {
        self.balance = self.balance.saturating_sub(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affordability_is_inclusive() {
        let mut wallet = Wallet::new(100);
        assert!(wallet.is_money_enough(100));
        assert!(!wallet.is_money_enough(101));

        wallet.decrease_money(40);
        wallet.earn(15);
        assert_eq!(wallet.balance(), 75);
    }
}
