/// The session's money counter.
///
/// Owned by the session and lent `&mut` to every operation that can earn or
/// spend, so each mutation site is visible in a signature.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Economy {
    balance: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("insufficient funds: need {cost}, have {balance}")]
pub struct InsufficientFunds {
    pub cost: u32,
    pub balance: u32,
}

impl Economy {
    pub fn new(balance: u32) -> Self {
        Self { balance }
    }

    pub fn balance(&self) -> u32 {
        self.balance
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.balance >= cost
    }

    /// Debit `cost`, or leave the balance untouched if it is not covered.
    pub fn try_spend(&mut self, cost: u32) -> Result<u32, InsufficientFunds> {
        let remaining = self.balance.checked_sub(cost).ok_or(InsufficientFunds {
            cost,
            balance: self.balance,
        })?;
        self.balance = remaining;
        Ok(remaining)
    }

    pub fn credit(&mut self, amount: u32) -> u32 {
        self.balance = self.balance.saturating_add(amount);
        self.balance
    }
}
