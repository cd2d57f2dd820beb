//! Set of frozen accounts.

use crate::error::LedgerError;
use gbt_types::Address;
use std::collections::HashSet;

#[derive(Clone, Debug, Default)]
pub struct Blacklist {
    accounts: HashSet<Address>,
}

impl Blacklist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.accounts.contains(address)
    }

    /// Returns `true` if the account was not already listed.
    pub fn insert(&mut self, address: Address) -> bool {
        self.accounts.insert(address)
    }

    /// Returns `true` if the account was listed.
    pub fn remove(&mut self, address: &Address) -> bool {
        self.accounts.remove(address)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Listed accounts in address order.
    pub fn sorted(&self) -> Vec<Address> {
        let mut out: Vec<Address> = self.accounts.iter().copied().collect();
        out.sort();
        out
    }

    /// Fail if any of `parties` is listed. The first listed party is reported.
    pub fn ensure_clear(&self, parties: &[&Address]) -> Result<(), LedgerError> {
        match parties.iter().find(|a| self.contains(a)) {
            Some(listed) => Err(LedgerError::AccountBlacklisted(**listed)),
            None => Ok(()),
        }
    }

    /// Fail unless `address` is listed.
    pub fn ensure_listed(&self, address: &Address) -> Result<(), LedgerError> {
        if self.contains(address) {
            Ok(())
        } else {
            Err(LedgerError::NotBlacklisted(*address))
        }
    }
}
