//! The ledger state machine.
//!
//! Every public mutation checks authorization first, then validates every
//! precondition, and only then writes. A call either commits fully and emits
//! exactly one [`LedgerEvent`], or returns an error and leaves state untouched.

use crate::access::{AccessControl, OwnershipState};
use crate::accounts::{Account, AccountBook};
use crate::blacklist::Blacklist;
use crate::error::LedgerError;
use crate::events::{EventBus, LedgerEvent};
use crate::fees::{FeeKind, FeeSchedule, FeeSplit};
use crate::genesis::GenesisConfig;
use crate::summary::LedgerSummary;
use gbt_types::{Address, LedgerVariant, Role, TokenMetadata, MAX_FEE_BPS};

#[derive(Debug)]
pub struct Ledger {
    variant: LedgerVariant,
    metadata: TokenMetadata,
    access: AccessControl,
    fees: FeeSchedule,
    book: AccountBook,
    blacklist: Blacklist,
    bus: EventBus,
    /// Grows with every commit until drained by [`Ledger::take_events`].
    journal: Vec<LedgerEvent>,
}

impl Ledger {
    /// Initialize a ledger where `deployer` holds every role and receives
    /// both fees.
    pub fn new(variant: LedgerVariant, deployer: Address) -> Result<Self, LedgerError> {
        if deployer.is_zero() {
            return Err(LedgerError::ZeroAddress("owner"));
        }
        Ok(Self {
            variant,
            metadata: TokenMetadata::default(),
            access: AccessControl::new(deployer),
            fees: FeeSchedule::new(deployer),
            book: AccountBook::new(),
            blacklist: Blacklist::new(),
            bus: EventBus::new(),
            journal: Vec::new(),
        })
    }

    /// Build a ledger from a validated genesis configuration.
    pub fn from_genesis(config: &GenesisConfig) -> Result<Self, LedgerError> {
        config.validate()?;
        let owner = config.owner;
        let mut ledger = Self::new(config.variant, owner)?;
        ledger.metadata = config.metadata();
        // Genesis assignments are not calls, so they emit no events.
        ledger.access.set_role(&owner, Role::Minter, config.minter.unwrap_or(owner))?;
        ledger.access.set_role(&owner, Role::Redeemer, config.redeemer.unwrap_or(owner))?;
        ledger.access.set_role(&owner, Role::Releaser, config.releaser.unwrap_or(owner))?;
        ledger.fees.set_fee(FeeKind::Dao, config.dao_fee_bps)?;
        ledger.fees.set_fee(FeeKind::Secondary, config.secondary_fee_bps)?;
        ledger.fees.set_wallet(FeeKind::Dao, config.dao_wallet.unwrap_or(owner))?;
        ledger
            .fees
            .set_wallet(FeeKind::Secondary, config.secondary_wallet.unwrap_or(owner))?;
        tracing::info!(
            variant = %config.variant,
            %owner,
            symbol = %ledger.metadata.symbol,
            "ledger initialized from genesis"
        );
        Ok(ledger)
    }

    /// Register an observer for every committed event.
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&LedgerEvent) + Send + Sync>) {
        self.bus.subscribe(listener);
    }

    // ── Read-only accessors ─────────────────────────────────────────────

    pub fn variant(&self) -> LedgerVariant {
        self.variant
    }

    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.metadata.decimals
    }

    pub fn owner(&self) -> Address {
        self.access.holder(Role::Owner)
    }

    pub fn pending_owner(&self) -> Option<Address> {
        self.access.ownership().pending()
    }

    pub fn ownership(&self) -> OwnershipState {
        self.access.ownership()
    }

    pub fn role_holder(&self, role: Role) -> Address {
        self.access.holder(role)
    }

    pub fn minter(&self) -> Address {
        self.access.holder(Role::Minter)
    }

    pub fn redeemer(&self) -> Address {
        self.access.holder(Role::Redeemer)
    }

    pub fn releaser(&self) -> Address {
        self.access.holder(Role::Releaser)
    }

    pub fn fee_schedule(&self) -> &FeeSchedule {
        &self.fees
    }

    pub fn dao_fee(&self) -> u32 {
        self.fees.dao_fee_bps
    }

    pub fn secondary_fee(&self) -> u32 {
        self.fees.secondary_fee_bps
    }

    pub fn dao_wallet(&self) -> Address {
        self.fees.dao_wallet
    }

    pub fn secondary_wallet(&self) -> Address {
        self.fees.secondary_wallet
    }

    pub fn total_supply(&self) -> u128 {
        self.book.total_supply()
    }

    pub fn account(&self, address: &Address) -> Account {
        self.book.account(address)
    }

    pub fn balance_of(&self, address: &Address) -> u128 {
        self.book.account(address).balance
    }

    pub fn locked_balance_of(&self, address: &Address) -> u128 {
        self.book.account(address).locked
    }

    pub fn unlocked_balance_of(&self, address: &Address) -> u128 {
        self.book.account(address).unlocked()
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.book.allowance(owner, spender)
    }

    pub fn is_blacklisted(&self, address: &Address) -> bool {
        self.blacklist.contains(address)
    }

    pub fn blacklisted_accounts(&self) -> Vec<Address> {
        self.blacklist.sorted()
    }

    /// Every known account in address order, zero balances included.
    pub fn holders(&self) -> Vec<(Address, Account)> {
        let mut out: Vec<(Address, Account)> =
            self.book.iter().map(|(a, acc)| (*a, *acc)).collect();
        out.sort_by_key(|(a, _)| *a);
        out
    }

    /// Events committed since the journal was last drained, oldest first.
    pub fn events(&self) -> &[LedgerEvent] {
        &self.journal
    }

    /// Hand the journal to the caller and start a fresh one.
    pub fn take_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.journal)
    }

    pub fn summary(&self) -> LedgerSummary {
        LedgerSummary {
            name: self.metadata.name.clone(),
            symbol: self.metadata.symbol.clone(),
            decimals: self.metadata.decimals,
            variant: self.variant,
            owner: self.owner(),
            pending_owner: self.pending_owner(),
            minter: self.minter(),
            redeemer: self.redeemer(),
            releaser: self.releaser(),
            dao_fee_bps: self.fees.dao_fee_bps,
            secondary_fee_bps: self.fees.secondary_fee_bps,
            dao_wallet: self.fees.dao_wallet,
            secondary_wallet: self.fees.secondary_wallet,
            total_supply: self.book.total_supply(),
            accounts: self.book.iter().count(),
            blacklisted: self.blacklist.sorted(),
        }
    }

    // ── Ownership and roles ─────────────────────────────────────────────

    pub fn propose_owner(&mut self, caller: &Address, new: Address) -> Result<(), LedgerError> {
        let owner = self.access.propose_owner(caller, new)?;
        self.commit(LedgerEvent::OwnershipTransferStarted {
            owner,
            pending: new,
        });
        Ok(())
    }

    pub fn accept_ownership(&mut self, caller: &Address) -> Result<(), LedgerError> {
        let previous = self.access.accept_ownership(caller)?;
        self.commit(LedgerEvent::OwnershipTransferred {
            previous,
            owner: *caller,
        });
        Ok(())
    }

    pub fn set_minter(&mut self, caller: &Address, new: Address) -> Result<(), LedgerError> {
        self.set_role(caller, Role::Minter, new)
    }

    pub fn set_redeemer(&mut self, caller: &Address, new: Address) -> Result<(), LedgerError> {
        self.set_role(caller, Role::Redeemer, new)
    }

    pub fn set_releaser(&mut self, caller: &Address, new: Address) -> Result<(), LedgerError> {
        self.set_role(caller, Role::Releaser, new)
    }

    fn set_role(&mut self, caller: &Address, role: Role, new: Address) -> Result<(), LedgerError> {
        let old = self.access.set_role(caller, role, new)?;
        self.commit(LedgerEvent::RoleChanged { role, old, new });
        Ok(())
    }

    // ── Fee configuration ───────────────────────────────────────────────

    pub fn set_dao_fee(&mut self, caller: &Address, bps: u32) -> Result<(), LedgerError> {
        self.set_fee(caller, FeeKind::Dao, bps)
    }

    pub fn set_secondary_fee(&mut self, caller: &Address, bps: u32) -> Result<(), LedgerError> {
        self.set_fee(caller, FeeKind::Secondary, bps)
    }

    pub fn set_dao_wallet(&mut self, caller: &Address, wallet: Address) -> Result<(), LedgerError> {
        self.set_fee_wallet(caller, FeeKind::Dao, wallet)
    }

    pub fn set_secondary_wallet(
        &mut self,
        caller: &Address,
        wallet: Address,
    ) -> Result<(), LedgerError> {
        self.set_fee_wallet(caller, FeeKind::Secondary, wallet)
    }

    fn set_fee(&mut self, caller: &Address, kind: FeeKind, bps: u32) -> Result<(), LedgerError> {
        self.access.require(caller, Role::Owner)?;
        let old = self.fees.set_fee(kind, bps)?;
        self.commit(LedgerEvent::FeeChanged { kind, old, new: bps });
        Ok(())
    }

    fn set_fee_wallet(
        &mut self,
        caller: &Address,
        kind: FeeKind,
        wallet: Address,
    ) -> Result<(), LedgerError> {
        self.access.require(caller, Role::Owner)?;
        let old = self.fees.set_wallet(kind, wallet)?;
        self.commit(LedgerEvent::FeeWalletChanged {
            kind,
            old,
            new: wallet,
        });
        Ok(())
    }

    // ── Supply ──────────────────────────────────────────────────────────

    /// Create `amount` units for `to`.
    ///
    /// Immediate-fee ledgers split the fees off right away. Lock-then-release
    /// ledgers credit the full amount locked and charge fees on release.
    pub fn mint(&mut self, caller: &Address, to: Address, amount: u128) -> Result<(), LedgerError> {
        self.access.require(caller, Role::Minter)?;
        if to.is_zero() {
            return Err(LedgerError::ZeroAddress("recipient"));
        }
        self.blacklist.ensure_clear(&[&to])?;

        if self.variant.locks_on_mint() {
            self.book.mint(&to, amount, true)?;
            self.commit(LedgerEvent::Locked {
                account: to,
                amount,
            });
        } else {
            let fees = self.fees.split(amount)?;
            self.book.credit(&[
                (self.fees.dao_wallet, fees.dao),
                (self.fees.secondary_wallet, fees.secondary),
                (to, fees.net_of(amount)),
            ])?;
            self.commit(LedgerEvent::Minted {
                to,
                amount,
                dao_fee: fees.dao,
                secondary_fee: fees.secondary,
            });
        }
        Ok(())
    }

    /// Unlock `amount` of `account`'s locked units, charging both fees on it.
    pub fn release(
        &mut self,
        caller: &Address,
        account: Address,
        amount: u128,
    ) -> Result<FeeSplit, LedgerError> {
        if !self.variant.locks_on_mint() {
            return Err(LedgerError::LockingDisabled);
        }
        self.access.require(caller, Role::Releaser)?;
        self.blacklist.ensure_clear(&[&account])?;

        let fees = self.fees.split(amount)?;
        // Debit first, credit second: a fee wallet releasing its own units
        // gets its fee straight back.
        self.book.release(&account, amount, fees.total())?;
        self.book.credit(&[
            (self.fees.dao_wallet, fees.dao),
            (self.fees.secondary_wallet, fees.secondary),
        ])?;
        self.commit(LedgerEvent::Released {
            account,
            amount,
            dao_fee: fees.dao,
            secondary_fee: fees.secondary,
        });
        Ok(fees)
    }

    /// Destroy `amount` of the caller's unlocked units.
    pub fn burn(&mut self, caller: &Address, amount: u128) -> Result<(), LedgerError> {
        self.blacklist.ensure_clear(&[caller])?;
        self.book.burn(caller, amount)?;
        self.commit(LedgerEvent::Burned {
            account: *caller,
            amount,
        });
        Ok(())
    }

    /// Burn `amount` of `account`'s unlocked units on its behalf, consuming
    /// the allowance `account` granted the redeemer.
    pub fn redeem(
        &mut self,
        caller: &Address,
        account: Address,
        amount: u128,
    ) -> Result<(), LedgerError> {
        self.access.require(caller, Role::Redeemer)?;
        self.blacklist.ensure_clear(&[&account])?;
        self.book.ensure_allowance(&account, caller, amount)?;
        self.book.burn(&account, amount)?;
        self.book.spend_allowance(&account, caller, amount)?;
        self.commit(LedgerEvent::Redeemed {
            account,
            redeemer: *caller,
            amount,
        });
        Ok(())
    }

    // ── Transfers and allowances ────────────────────────────────────────

    pub fn transfer(
        &mut self,
        caller: &Address,
        to: Address,
        amount: u128,
    ) -> Result<(), LedgerError> {
        if to.is_zero() {
            return Err(LedgerError::ZeroAddress("recipient"));
        }
        self.blacklist.ensure_clear(&[caller, &to])?;
        self.book.transfer(caller, &to, amount)?;
        self.commit(LedgerEvent::Transfer {
            from: *caller,
            to,
            amount,
        });
        Ok(())
    }

    pub fn approve(
        &mut self,
        caller: &Address,
        spender: Address,
        amount: u128,
    ) -> Result<(), LedgerError> {
        if spender.is_zero() {
            return Err(LedgerError::ZeroAddress("spender"));
        }
        self.book.approve(caller, &spender, amount);
        self.commit(LedgerEvent::Approval {
            owner: *caller,
            spender,
            amount,
        });
        Ok(())
    }

    /// Move `amount` from `from` to `to` using the caller's allowance.
    pub fn transfer_from(
        &mut self,
        caller: &Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), LedgerError> {
        if to.is_zero() {
            return Err(LedgerError::ZeroAddress("recipient"));
        }
        self.blacklist.ensure_clear(&[&from, &to, caller])?;
        self.book.ensure_allowance(&from, caller, amount)?;
        self.book.transfer(&from, &to, amount)?;
        self.book.spend_allowance(&from, caller, amount)?;
        self.commit(LedgerEvent::Transfer { from, to, amount });
        Ok(())
    }

    // ── Blacklist ───────────────────────────────────────────────────────

    pub fn blacklist(&mut self, caller: &Address, account: Address) -> Result<(), LedgerError> {
        self.access.require(caller, Role::Owner)?;
        if account.is_zero() {
            return Err(LedgerError::ZeroAddress("account"));
        }
        self.blacklist.insert(account);
        self.commit(LedgerEvent::Blacklisted { account });
        Ok(())
    }

    pub fn unblacklist(&mut self, caller: &Address, account: Address) -> Result<(), LedgerError> {
        self.access.require(caller, Role::Owner)?;
        self.blacklist.remove(&account);
        self.commit(LedgerEvent::Unblacklisted { account });
        Ok(())
    }

    /// Wipe a blacklisted account's balance, locked units included, and
    /// remove it from supply. Returns the number of units destroyed.
    pub fn destroy_blocked_funds(
        &mut self,
        caller: &Address,
        account: Address,
    ) -> Result<u128, LedgerError> {
        self.access.require(caller, Role::Owner)?;
        self.blacklist.ensure_listed(&account)?;
        let destroyed = self.book.destroy(&account);
        self.commit(LedgerEvent::BlockedFundsDestroyed {
            account,
            amount: destroyed.balance,
            locked: destroyed.locked,
        });
        Ok(destroyed.balance)
    }

    // ── Consistency ─────────────────────────────────────────────────────

    /// Recompute the ledger invariants from scratch.
    pub fn verify_invariants(&self) -> Result<(), LedgerError> {
        let mut sum: u128 = 0;
        for (address, account) in self.book.iter() {
            if account.locked > account.balance {
                return Err(LedgerError::InvariantViolated(format!(
                    "{address} has locked {} above balance {}",
                    account.locked, account.balance
                )));
            }
            if !self.variant.locks_on_mint() && account.locked != 0 {
                return Err(LedgerError::InvariantViolated(format!(
                    "{address} has locked units on an immediate-fee ledger"
                )));
            }
            sum = sum.checked_add(account.balance).ok_or_else(|| {
                LedgerError::InvariantViolated("balances overflow".to_string())
            })?;
        }
        if sum != self.book.total_supply() {
            return Err(LedgerError::InvariantViolated(format!(
                "balances sum to {sum}, total supply is {}",
                self.book.total_supply()
            )));
        }
        for kind in [FeeKind::Dao, FeeKind::Secondary] {
            if self.fees.fee_bps(kind) > MAX_FEE_BPS {
                return Err(LedgerError::InvariantViolated(format!(
                    "{kind} fee {} above cap",
                    self.fees.fee_bps(kind)
                )));
            }
            if self.fees.wallet(kind).is_zero() {
                return Err(LedgerError::InvariantViolated(format!("{kind} wallet is zero")));
            }
        }
        for role in [Role::Owner, Role::Minter, Role::Redeemer, Role::Releaser] {
            if self.access.holder(role).is_zero() {
                return Err(LedgerError::InvariantViolated(format!("{role} is zero")));
            }
        }
        Ok(())
    }

    fn commit(&mut self, event: LedgerEvent) {
        tracing::info!(event = ?event, total_supply = self.book.total_supply(), "ledger event");
        self.bus.emit(&event);
        self.journal.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gbt_types::UNIT;
    use std::sync::{Arc, Mutex};

    fn addr(n: u64) -> Address {
        Address::from_low_u64(n)
    }

    const OWNER: u64 = 1;
    const USER: u64 = 10;
    const DAO: u64 = 20;
    const SECONDARY: u64 = 21;

    fn lock_ledger() -> Ledger {
        let owner = addr(OWNER);
        let mut ledger = Ledger::new(LedgerVariant::LockThenRelease, owner).unwrap();
        ledger.set_dao_wallet(&owner, addr(DAO)).unwrap();
        ledger.set_secondary_wallet(&owner, addr(SECONDARY)).unwrap();
        ledger.set_secondary_fee(&owner, 25).unwrap();
        ledger
    }

    #[test]
    fn new_ledger_has_deployer_defaults() {
        let ledger = Ledger::new(LedgerVariant::ImmediateFee, addr(OWNER)).unwrap();
        assert_eq!(ledger.owner(), addr(OWNER));
        assert_eq!(ledger.minter(), addr(OWNER));
        assert_eq!(ledger.redeemer(), addr(OWNER));
        assert_eq!(ledger.releaser(), addr(OWNER));
        assert_eq!(ledger.dao_wallet(), addr(OWNER));
        assert_eq!(ledger.secondary_wallet(), addr(OWNER));
        assert_eq!(ledger.dao_fee(), 10);
        assert_eq!(ledger.secondary_fee(), 0);
        assert_eq!(ledger.pending_owner(), None);
        assert_eq!(ledger.decimals(), 6);
        assert_eq!(ledger.total_supply(), 0);
    }

    #[test]
    fn zero_deployer_is_rejected() {
        assert_eq!(
            Ledger::new(LedgerVariant::ImmediateFee, Address::ZERO).unwrap_err(),
            LedgerError::ZeroAddress("owner")
        );
    }

    #[test]
    fn immediate_fee_mint_splits_fees() {
        let owner = addr(OWNER);
        let mut ledger = Ledger::new(LedgerVariant::ImmediateFee, owner).unwrap();
        ledger.set_dao_wallet(&owner, addr(DAO)).unwrap();
        let amount = 1_000 * UNIT;
        let expected_fee = amount * 10 / 10_000;

        ledger.mint(&owner, addr(USER), amount).unwrap();

        assert_eq!(ledger.balance_of(&addr(USER)), amount - expected_fee);
        assert_eq!(ledger.balance_of(&addr(DAO)), expected_fee);
        assert_eq!(ledger.locked_balance_of(&addr(USER)), 0);
        assert_eq!(ledger.total_supply(), amount);
        assert_eq!(
            ledger.events().last(),
            Some(&LedgerEvent::Minted {
                to: addr(USER),
                amount,
                dao_fee: expected_fee,
                secondary_fee: 0,
            })
        );
    }

    #[test]
    fn immediate_fee_mint_without_fee() {
        let owner = addr(OWNER);
        let mut ledger = Ledger::new(LedgerVariant::ImmediateFee, owner).unwrap();
        ledger.set_dao_fee(&owner, 0).unwrap();
        ledger.mint(&owner, addr(USER), 1_000 * UNIT).unwrap();
        assert_eq!(ledger.balance_of(&addr(USER)), 1_000 * UNIT);
    }

    #[test]
    fn immediate_fee_mint_to_fee_wallet_lands_on_same_account() {
        let owner = addr(OWNER);
        let mut ledger = Ledger::new(LedgerVariant::ImmediateFee, owner).unwrap();
        ledger.set_dao_wallet(&owner, addr(DAO)).unwrap();
        ledger.mint(&owner, addr(DAO), 10_000).unwrap();
        // fee 10 + net 9_990 both go to the DAO wallet.
        assert_eq!(ledger.balance_of(&addr(DAO)), 10_000);
        ledger.verify_invariants().unwrap();
    }

    #[test]
    fn release_on_immediate_fee_ledger_is_disabled() {
        let owner = addr(OWNER);
        let mut ledger = Ledger::new(LedgerVariant::ImmediateFee, owner).unwrap();
        ledger.mint(&owner, addr(USER), 100).unwrap();
        assert_eq!(ledger.release(&owner, addr(USER), 1), Err(LedgerError::LockingDisabled));
    }

    #[test]
    fn immediate_fee_mint_of_huge_amount_splits_exactly() {
        let owner = addr(OWNER);
        let mut ledger = Ledger::new(LedgerVariant::ImmediateFee, owner).unwrap();
        ledger.set_dao_wallet(&owner, addr(DAO)).unwrap();
        let amount = u128::MAX / 2;

        ledger.mint(&owner, addr(USER), amount).unwrap();

        let dao_fee = amount / 10_000 * 10 + amount % 10_000 * 10 / 10_000;
        assert_eq!(ledger.balance_of(&addr(DAO)), dao_fee);
        assert_eq!(ledger.balance_of(&addr(USER)), amount - dao_fee);
        assert_eq!(ledger.total_supply(), amount);
        ledger.verify_invariants().unwrap();
    }

    #[test]
    fn huge_locked_mint_can_be_released() {
        let mut ledger = lock_ledger();
        let owner = addr(OWNER);
        let amount = u128::MAX / 2;
        ledger.mint(&owner, addr(USER), amount).unwrap();

        let fees = ledger.release(&owner, addr(USER), amount).unwrap();

        assert_eq!(fees.dao, amount / 10_000 * 10 + amount % 10_000 * 10 / 10_000);
        assert_eq!(fees.secondary, amount / 10_000 * 25 + amount % 10_000 * 25 / 10_000);
        assert_eq!(ledger.locked_balance_of(&addr(USER)), 0);
        assert_eq!(ledger.unlocked_balance_of(&addr(USER)), amount - fees.total());
        assert_eq!(ledger.total_supply(), amount);
        ledger.verify_invariants().unwrap();
    }

    #[test]
    fn take_events_drains_the_journal() {
        let mut ledger = lock_ledger();
        let owner = addr(OWNER);
        let setup = ledger.take_events();
        assert_eq!(setup.len(), 3);
        assert!(ledger.events().is_empty());

        ledger.mint(&owner, addr(USER), 100).unwrap();
        assert_eq!(ledger.take_events().len(), 1);
        assert!(ledger.take_events().is_empty());
    }

    #[test]
    fn lock_mint_locks_in_full() {
        let mut ledger = lock_ledger();
        ledger.mint(&addr(OWNER), addr(USER), 1_000 * UNIT).unwrap();
        assert_eq!(ledger.balance_of(&addr(USER)), 1_000 * UNIT);
        assert_eq!(ledger.locked_balance_of(&addr(USER)), 1_000 * UNIT);
        assert_eq!(ledger.unlocked_balance_of(&addr(USER)), 0);
        assert_eq!(ledger.balance_of(&addr(DAO)), 0);
        assert_eq!(
            ledger.events().last(),
            Some(&LedgerEvent::Locked {
                account: addr(USER),
                amount: 1_000 * UNIT,
            })
        );
    }

    #[test]
    fn release_charges_fees_on_released_amount() {
        let mut ledger = lock_ledger();
        let owner = addr(OWNER);
        ledger.mint(&owner, addr(USER), 1_000 * UNIT).unwrap();

        let fees = ledger.release(&owner, addr(USER), 500 * UNIT).unwrap();

        assert_eq!(fees, FeeSplit { dao: 50_000, secondary: 125_000 });
        assert_eq!(ledger.locked_balance_of(&addr(USER)), 500 * UNIT);
        assert_eq!(ledger.balance_of(&addr(USER)), 999_825_000);
        assert_eq!(ledger.unlocked_balance_of(&addr(USER)), 499_825_000);
        assert_eq!(ledger.balance_of(&addr(DAO)), 50_000);
        assert_eq!(ledger.balance_of(&addr(SECONDARY)), 125_000);
        assert_eq!(ledger.total_supply(), 1_000 * UNIT);
        ledger.verify_invariants().unwrap();
    }

    #[test]
    fn release_by_fee_wallet_nets_to_zero_fee_loss() {
        let mut ledger = lock_ledger();
        let owner = addr(OWNER);
        ledger.mint(&owner, addr(DAO), 10_000).unwrap();

        let fees = ledger.release(&owner, addr(DAO), 10_000).unwrap();

        assert_eq!(fees.dao, 10);
        assert_eq!(fees.secondary, 25);
        // Only the secondary fee leaves the DAO wallet.
        assert_eq!(ledger.balance_of(&addr(DAO)), 10_000 - 25);
        assert_eq!(ledger.unlocked_balance_of(&addr(DAO)), 10_000 - 25);
        assert_eq!(ledger.locked_balance_of(&addr(DAO)), 0);
        assert_eq!(ledger.balance_of(&addr(SECONDARY)), 25);
        ledger.verify_invariants().unwrap();
    }

    #[test]
    fn release_when_both_wallets_are_the_account() {
        let mut ledger = lock_ledger();
        let owner = addr(OWNER);
        ledger.set_secondary_wallet(&owner, addr(DAO)).unwrap();
        ledger.mint(&owner, addr(DAO), 10_000).unwrap();
        ledger.release(&owner, addr(DAO), 10_000).unwrap();
        assert_eq!(ledger.balance_of(&addr(DAO)), 10_000);
        assert_eq!(ledger.unlocked_balance_of(&addr(DAO)), 10_000);
        assert_eq!(ledger.total_supply(), 10_000);
    }

    #[test]
    fn release_beyond_locked_is_rejected_without_effect() {
        let mut ledger = lock_ledger();
        let owner = addr(OWNER);
        ledger.mint(&owner, addr(USER), 100).unwrap();
        let events_before = ledger.events().len();
        assert_eq!(
            ledger.release(&owner, addr(USER), 101),
            Err(LedgerError::InsufficientLockedBalance { needed: 101, available: 100 })
        );
        assert_eq!(ledger.locked_balance_of(&addr(USER)), 100);
        assert_eq!(ledger.events().len(), events_before);
    }

    #[test]
    fn partial_releases_accumulate() {
        let mut ledger = lock_ledger();
        let owner = addr(OWNER);
        ledger.set_dao_fee(&owner, 0).unwrap();
        ledger.set_secondary_fee(&owner, 0).unwrap();
        ledger.mint(&owner, addr(USER), 300).unwrap();
        for _ in 0..3 {
            ledger.release(&owner, addr(USER), 100).unwrap();
        }
        assert_eq!(ledger.locked_balance_of(&addr(USER)), 0);
        assert_eq!(ledger.unlocked_balance_of(&addr(USER)), 300);
        assert!(ledger.release(&owner, addr(USER), 1).is_err());
    }

    #[test]
    fn burn_draws_only_on_unlocked() {
        let mut ledger = lock_ledger();
        let owner = addr(OWNER);
        ledger.set_dao_fee(&owner, 0).unwrap();
        ledger.set_secondary_fee(&owner, 0).unwrap();
        ledger.mint(&owner, addr(USER), 100).unwrap();
        ledger.release(&owner, addr(USER), 40).unwrap();

        assert_eq!(
            ledger.burn(&addr(USER), 41),
            Err(LedgerError::InsufficientUnlockedBalance { needed: 41, available: 40 })
        );
        ledger.burn(&addr(USER), 40).unwrap();
        assert_eq!(ledger.balance_of(&addr(USER)), 60);
        assert_eq!(ledger.locked_balance_of(&addr(USER)), 60);
        assert_eq!(ledger.total_supply(), 60);
    }

    #[test]
    fn redeem_requires_role_and_allowance() {
        let owner = addr(OWNER);
        let redeemer = addr(5);
        let mut ledger = Ledger::new(LedgerVariant::ImmediateFee, owner).unwrap();
        ledger.set_dao_fee(&owner, 0).unwrap();
        ledger.set_redeemer(&owner, redeemer).unwrap();
        ledger.mint(&owner, addr(USER), 1_000).unwrap();

        assert_eq!(
            ledger.redeem(&redeemer, addr(USER), 100),
            Err(LedgerError::AllowanceExceeded { needed: 100, available: 0 })
        );
        ledger.approve(&addr(USER), redeemer, 300).unwrap();
        assert_eq!(
            ledger.redeem(&owner, addr(USER), 100),
            Err(LedgerError::Unauthorized { caller: owner, role: Role::Redeemer })
        );

        ledger.redeem(&redeemer, addr(USER), 100).unwrap();
        assert_eq!(ledger.balance_of(&addr(USER)), 900);
        assert_eq!(ledger.allowance(&addr(USER), &redeemer), 200);
        assert_eq!(ledger.total_supply(), 900);
    }

    #[test]
    fn redeem_with_insufficient_balance_keeps_allowance() {
        let owner = addr(OWNER);
        let mut ledger = Ledger::new(LedgerVariant::ImmediateFee, owner).unwrap();
        ledger.set_dao_fee(&owner, 0).unwrap();
        ledger.mint(&owner, addr(USER), 50).unwrap();
        ledger.approve(&addr(USER), owner, 100).unwrap();
        assert_eq!(
            ledger.redeem(&owner, addr(USER), 60),
            Err(LedgerError::InsufficientUnlockedBalance { needed: 60, available: 50 })
        );
        assert_eq!(ledger.allowance(&addr(USER), &owner), 100);
    }

    #[test]
    fn transfer_from_consumes_allowance() {
        let owner = addr(OWNER);
        let spender = addr(7);
        let mut ledger = Ledger::new(LedgerVariant::ImmediateFee, owner).unwrap();
        ledger.set_dao_fee(&owner, 0).unwrap();
        ledger.mint(&owner, addr(USER), 100).unwrap();
        ledger.approve(&addr(USER), spender, 60).unwrap();

        ledger.transfer_from(&spender, addr(USER), addr(8), 60).unwrap();
        assert_eq!(ledger.balance_of(&addr(8)), 60);
        assert_eq!(ledger.allowance(&addr(USER), &spender), 0);
        assert!(matches!(
            ledger.transfer_from(&spender, addr(USER), addr(8), 1),
            Err(LedgerError::AllowanceExceeded { .. })
        ));
    }

    #[test]
    fn transfer_to_zero_is_rejected() {
        let owner = addr(OWNER);
        let mut ledger = Ledger::new(LedgerVariant::ImmediateFee, owner).unwrap();
        ledger.mint(&owner, owner, 100).unwrap();
        assert_eq!(
            ledger.transfer(&owner, Address::ZERO, 1),
            Err(LedgerError::ZeroAddress("recipient"))
        );
        assert_eq!(
            ledger.mint(&owner, Address::ZERO, 1),
            Err(LedgerError::ZeroAddress("recipient"))
        );
    }

    #[test]
    fn blacklisted_accounts_are_frozen() {
        let mut ledger = lock_ledger();
        let owner = addr(OWNER);
        ledger.mint(&owner, addr(USER), 1_000).unwrap();
        ledger.blacklist(&owner, addr(USER)).unwrap();

        assert_eq!(
            ledger.mint(&owner, addr(USER), 1),
            Err(LedgerError::AccountBlacklisted(addr(USER)))
        );
        assert_eq!(
            ledger.release(&owner, addr(USER), 1),
            Err(LedgerError::AccountBlacklisted(addr(USER)))
        );
        assert_eq!(
            ledger.burn(&addr(USER), 0),
            Err(LedgerError::AccountBlacklisted(addr(USER)))
        );
        assert_eq!(
            ledger.redeem(&owner, addr(USER), 0),
            Err(LedgerError::AccountBlacklisted(addr(USER)))
        );

        ledger.unblacklist(&owner, addr(USER)).unwrap();
        ledger.release(&owner, addr(USER), 1_000).unwrap();
    }

    #[test]
    fn destroy_requires_blacklist() {
        let mut ledger = lock_ledger();
        let owner = addr(OWNER);
        ledger.mint(&owner, addr(USER), 1_000).unwrap();
        assert_eq!(
            ledger.destroy_blocked_funds(&owner, addr(USER)),
            Err(LedgerError::NotBlacklisted(addr(USER)))
        );
        ledger.blacklist(&owner, addr(USER)).unwrap();
        assert_eq!(ledger.destroy_blocked_funds(&owner, addr(USER)), Ok(1_000));
        assert_eq!(ledger.account(&addr(USER)), Account::default());
        assert_eq!(ledger.total_supply(), 0);
    }

    #[test]
    fn owner_only_operations_reject_others() {
        let mut ledger = lock_ledger();
        let stranger = addr(99);
        let denied = Err(LedgerError::Unauthorized { caller: stranger, role: Role::Owner });
        assert_eq!(ledger.set_minter(&stranger, stranger), denied);
        assert_eq!(ledger.set_dao_fee(&stranger, 5), denied);
        assert_eq!(ledger.set_secondary_wallet(&stranger, stranger), denied);
        assert_eq!(ledger.blacklist(&stranger, addr(USER)), denied);
        assert_eq!(ledger.unblacklist(&stranger, addr(USER)), denied);
        assert_eq!(ledger.propose_owner(&stranger, stranger), denied);
        assert_eq!(ledger.destroy_blocked_funds(&stranger, addr(USER)).map(|_| ()), denied);
        assert_eq!(ledger.dao_fee(), 10);
    }

    #[test]
    fn setters_emit_old_and_new() {
        let mut ledger = lock_ledger();
        let owner = addr(OWNER);
        ledger.set_dao_fee(&owner, 20).unwrap();
        assert_eq!(
            ledger.events().last(),
            Some(&LedgerEvent::FeeChanged { kind: FeeKind::Dao, old: 10, new: 20 })
        );
        ledger.set_releaser(&owner, addr(4)).unwrap();
        assert_eq!(
            ledger.events().last(),
            Some(&LedgerEvent::RoleChanged { role: Role::Releaser, old: owner, new: addr(4) })
        );
        assert_eq!(ledger.releaser(), addr(4));
    }

    #[test]
    fn ownership_handover_moves_owner_only() {
        let mut ledger = lock_ledger();
        let owner = addr(OWNER);
        let next = addr(2);
        ledger.propose_owner(&owner, next).unwrap();
        assert_eq!(ledger.pending_owner(), Some(next));
        ledger.accept_ownership(&next).unwrap();
        assert_eq!(ledger.owner(), next);
        assert_eq!(ledger.pending_owner(), None);
        // Other roles stay where they were.
        assert_eq!(ledger.minter(), owner);
        assert!(ledger.set_dao_fee(&owner, 5).is_err());
        ledger.set_dao_fee(&next, 5).unwrap();
    }

    #[test]
    fn each_committed_call_emits_exactly_one_event() {
        let mut ledger = lock_ledger();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        ledger.subscribe(Box::new(move |e| sink.lock().unwrap().push(e.clone())));
        let owner = addr(OWNER);
        let before = ledger.events().len();

        ledger.mint(&owner, addr(USER), 1_000).unwrap();
        ledger.release(&owner, addr(USER), 1_000).unwrap();
        assert!(ledger.transfer(&addr(USER), addr(2), 10_000).is_err());
        ledger.transfer(&addr(USER), addr(2), 10).unwrap();

        assert_eq!(ledger.events().len() - before, 3);
        assert_eq!(seen.lock().unwrap().len(), 3);
        assert_eq!(&seen.lock().unwrap()[..], &ledger.events()[before..]);
    }

    #[test]
    fn summary_reflects_configuration() {
        let mut ledger = lock_ledger();
        let owner = addr(OWNER);
        ledger.blacklist(&owner, addr(USER)).unwrap();
        ledger.propose_owner(&owner, addr(2)).unwrap();
        let summary = ledger.summary();
        assert_eq!(summary.owner, owner);
        assert_eq!(summary.pending_owner, Some(addr(2)));
        assert_eq!(summary.dao_wallet, addr(DAO));
        assert_eq!(summary.secondary_fee_bps, 25);
        assert_eq!(summary.blacklisted, vec![addr(USER)]);
        assert_eq!(summary.variant, LedgerVariant::LockThenRelease);
    }
}
