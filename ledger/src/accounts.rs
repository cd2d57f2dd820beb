//! Balance, lock and allowance bookkeeping.
//!
//! Accounts are created implicitly on first credit and never removed; a
//! missing entry reads as a zero account. Every mutating method validates
//! before writing so a failed call leaves the book untouched.

use crate::error::LedgerError;
use gbt_types::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-holder balance record. `locked <= balance` always holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Total units owned, locked and unlocked.
    pub balance: u128,
    /// Portion of `balance` not yet released.
    pub locked: u128,
}

impl Account {
    pub fn unlocked(&self) -> u128 {
        self.balance - self.locked
    }
}

#[derive(Clone, Debug, Default)]
pub struct AccountBook {
    accounts: HashMap<Address, Account>,
    allowances: HashMap<(Address, Address), u128>,
    total_supply: u128,
}

impl AccountBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account(&self, address: &Address) -> Account {
        self.accounts.get(address).copied().unwrap_or_default()
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Address, &Account)> {
        self.accounts.iter()
    }

    /// Fail unless `address` can spend `amount` of unlocked units.
    pub fn ensure_unlocked(&self, address: &Address, amount: u128) -> Result<(), LedgerError> {
        let available = self.account(address).unlocked();
        if amount > available {
            return Err(LedgerError::InsufficientUnlockedBalance {
                needed: amount,
                available,
            });
        }
        Ok(())
    }

    /// Create `amount` new units in `to`, optionally locked. Raises total supply.
    pub fn mint(&mut self, to: &Address, amount: u128, locked: bool) -> Result<(), LedgerError> {
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let mut account = self.account(to);
        account.balance = account
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        if locked {
            account.locked += amount;
        }
        self.accounts.insert(*to, account);
        self.total_supply = supply;
        Ok(())
    }

    /// Destroy `amount` unlocked units held by `from`. Lowers total supply.
    pub fn burn(&mut self, from: &Address, amount: u128) -> Result<(), LedgerError> {
        self.ensure_unlocked(from, amount)?;
        let mut account = self.account(from);
        account.balance -= amount;
        self.accounts.insert(*from, account);
        // Supply is the sum of all balances, so it covers any single balance.
        self.total_supply -= amount;
        Ok(())
    }

    /// Move `amount` unlocked units from `from` to `to`.
    ///
    /// Debits before crediting, so `from == to` is a no-op.
    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), LedgerError> {
        self.ensure_unlocked(from, amount)?;
        if from == to {
            return Ok(());
        }
        let mut receiver = self.account(to);
        receiver.balance = receiver
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let mut sender = self.account(from);
        sender.balance -= amount;
        self.accounts.insert(*from, sender);
        self.accounts.insert(*to, receiver);
        Ok(())
    }

    /// Unlock `amount` of `address`'s locked units and debit `fee` from its
    /// balance.
    ///
    /// The fee leaves circulation here. Crediting it to the fee wallets with
    /// [`credit`](Self::credit) must happen afterwards, so a wallet releasing
    /// its own units nets to zero.
    pub fn release(
        &mut self,
        address: &Address,
        amount: u128,
        fee: u128,
    ) -> Result<(), LedgerError> {
        let mut account = self.account(address);
        if amount > account.locked {
            return Err(LedgerError::InsufficientLockedBalance {
                needed: amount,
                available: account.locked,
            });
        }
        if fee > amount {
            return Err(LedgerError::Overflow);
        }
        account.locked -= amount;
        account.balance -= fee;
        self.accounts.insert(*address, account);
        self.total_supply -= fee;
        Ok(())
    }

    /// Create unlocked units for several recipients at once. Raises total supply.
    ///
    /// Either every credit lands or none does. Recipients may repeat; their
    /// credits add up.
    pub fn credit(&mut self, credits: &[(Address, u128)]) -> Result<(), LedgerError> {
        let total = credits
            .iter()
            .try_fold(0u128, |acc, (_, amount)| acc.checked_add(*amount))
            .ok_or(LedgerError::Overflow)?;
        let supply = self
            .total_supply
            .checked_add(total)
            .ok_or(LedgerError::Overflow)?;
        for (to, amount) in credits {
            // Each balance is bounded by the new supply, so plain adds are safe.
            self.accounts.entry(*to).or_default().balance += *amount;
        }
        self.total_supply = supply;
        Ok(())
    }

    /// Wipe an account's balance and lock. Returns the record as it was.
    pub fn destroy(&mut self, address: &Address) -> Account {
        let account = self.account(address);
        if self.accounts.contains_key(address) {
            self.accounts.insert(*address, Account::default());
        }
        self.total_supply -= account.balance;
        account
    }

    pub fn approve(&mut self, owner: &Address, spender: &Address, amount: u128) {
        self.allowances.insert((*owner, *spender), amount);
    }

    /// Fail unless `spender` may draw `amount` from `owner`.
    pub fn ensure_allowance(
        &self,
        owner: &Address,
        spender: &Address,
        amount: u128,
    ) -> Result<(), LedgerError> {
        let available = self.allowance(owner, spender);
        if amount > available {
            return Err(LedgerError::AllowanceExceeded {
                needed: amount,
                available,
            });
        }
        Ok(())
    }

    /// Consume `amount` of `spender`'s allowance over `owner`'s units.
    ///
    /// An allowance of `u128::MAX` is treated as unlimited and never decreases.
    pub fn spend_allowance(
        &mut self,
        owner: &Address,
        spender: &Address,
        amount: u128,
    ) -> Result<(), LedgerError> {
        self.ensure_allowance(owner, spender, amount)?;
        let current = self.allowance(owner, spender);
        if current != u128::MAX {
            self.allowances.insert((*owner, *spender), current - amount);
        }
        Ok(())
    }
}
