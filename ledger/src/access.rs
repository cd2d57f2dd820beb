//! Role-based access control with two-phase ownership transfer.
//!
//! Each capability is held by exactly one address. Ownership moves through an
//! explicit state machine so a mistyped proposal can be replaced before it
//! is accepted:
//!
//! ```text
//! Stable{owner} --propose--> PendingTransfer{owner, pending} --accept--> Stable{pending}
//!                                   |  ^
//!                                   +--+ propose (replaces pending)
//! ```

use crate::error::LedgerError;
use gbt_types::{Address, Role};
use serde::{Deserialize, Serialize};

/// Ownership lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum OwnershipState {
    Stable { owner: Address },
    PendingTransfer { owner: Address, pending: Address },
}

impl OwnershipState {
    pub fn owner(&self) -> Address {
        match self {
            Self::Stable { owner } | Self::PendingTransfer { owner, .. } => *owner,
        }
    }

    pub fn pending(&self) -> Option<Address> {
        match self {
            Self::Stable { .. } => None,
            Self::PendingTransfer { pending, .. } => Some(*pending),
        }
    }
}

/// Outcome of a capability check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Authorization {
    Granted,
    Denied { role: Role, holder: Address },
}

impl Authorization {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Authorization table: who holds each role.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControl {
    ownership: OwnershipState,
    minter: Address,
    redeemer: Address,
    releaser: Address,
}

impl AccessControl {
    /// Give every role to `initial`.
    pub fn new(initial: Address) -> Self {
        Self {
            ownership: OwnershipState::Stable { owner: initial },
            minter: initial,
            redeemer: initial,
            releaser: initial,
        }
    }

    pub fn ownership(&self) -> OwnershipState {
        self.ownership
    }

    /// Current holder of `role`.
    pub fn holder(&self, role: Role) -> Address {
        match role {
            Role::Owner => self.ownership.owner(),
            Role::Minter => self.minter,
            Role::Redeemer => self.redeemer,
            Role::Releaser => self.releaser,
        }
    }

    pub fn check(&self, caller: &Address, role: Role) -> Authorization {
        let holder = self.holder(role);
        if holder == *caller {
            Authorization::Granted
        } else {
            Authorization::Denied { role, holder }
        }
    }

    /// Like [`check`](Self::check), but as a rejection the caller can propagate.
    pub fn require(&self, caller: &Address, role: Role) -> Result<(), LedgerError> {
        match self.check(caller, role) {
            Authorization::Granted => Ok(()),
            Authorization::Denied { role, .. } => Err(LedgerError::Unauthorized {
                caller: *caller,
                role,
            }),
        }
    }

    /// Assign a non-owner role. Returns the previous holder.
    ///
    /// Ownership cannot be assigned directly; it only moves through
    /// [`propose_owner`](Self::propose_owner) and
    /// [`accept_ownership`](Self::accept_ownership).
    pub fn set_role(
        &mut self,
        caller: &Address,
        role: Role,
        new: Address,
    ) -> Result<Address, LedgerError> {
        self.require(caller, Role::Owner)?;
        if new.is_zero() {
            return Err(LedgerError::ZeroAddress(role_field(role)));
        }
        let slot = match role {
            Role::Minter => &mut self.minter,
            Role::Redeemer => &mut self.redeemer,
            Role::Releaser => &mut self.releaser,
            Role::Owner => {
                return Err(LedgerError::Unauthorized {
                    caller: *caller,
                    role: Role::Owner,
                })
            }
        };
        Ok(std::mem::replace(slot, new))
    }

    /// Start (or replace) an ownership transfer. Returns the current owner.
    pub fn propose_owner(
        &mut self,
        caller: &Address,
        new: Address,
    ) -> Result<Address, LedgerError> {
        self.require(caller, Role::Owner)?;
        if new.is_zero() {
            return Err(LedgerError::ZeroAddress("pending owner"));
        }
        let owner = self.ownership.owner();
        self.ownership = OwnershipState::PendingTransfer {
            owner,
            pending: new,
        };
        Ok(owner)
    }

    /// Complete a pending transfer. Only the pending owner may call this.
    /// Returns the previous owner.
    pub fn accept_ownership(&mut self, caller: &Address) -> Result<Address, LedgerError> {
        match self.ownership {
            OwnershipState::Stable { .. } => Err(LedgerError::NoPendingOwner),
            OwnershipState::PendingTransfer { owner, pending } => {
                if pending != *caller {
                    return Err(LedgerError::Unauthorized {
                        caller: *caller,
                        role: Role::Owner,
                    });
                }
                self.ownership = OwnershipState::Stable { owner: pending };
                Ok(owner)
            }
        }
    }
}

fn role_field(role: Role) -> &'static str {
    match role {
        Role::Owner => "owner",
        Role::Minter => "minter",
        Role::Redeemer => "redeemer",
        Role::Releaser => "releaser",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u64) -> Address {
        Address::from_low_u64(n)
    }

    #[test]
    fn initial_holder_has_every_role() {
        let acl = AccessControl::new(addr(1));
        for role in [Role::Owner, Role::Minter, Role::Redeemer, Role::Releaser] {
            assert!(acl.check(&addr(1), role).is_granted());
            assert_eq!(
                acl.check(&addr(2), role),
                Authorization::Denied { role, holder: addr(1) }
            );
        }
    }

    #[test]
    fn set_role_requires_owner_and_non_zero() {
        let mut acl = AccessControl::new(addr(1));
        assert_eq!(
            acl.set_role(&addr(2), Role::Minter, addr(3)),
            Err(LedgerError::Unauthorized { caller: addr(2), role: Role::Owner })
        );
        assert_eq!(
            acl.set_role(&addr(1), Role::Minter, Address::ZERO),
            Err(LedgerError::ZeroAddress("minter"))
        );
        assert_eq!(acl.set_role(&addr(1), Role::Minter, addr(3)), Ok(addr(1)));
        assert_eq!(acl.holder(Role::Minter), addr(3));
        assert_eq!(acl.holder(Role::Redeemer), addr(1));
    }

    #[test]
    fn owner_cannot_be_set_directly() {
        let mut acl = AccessControl::new(addr(1));
        assert!(acl.set_role(&addr(1), Role::Owner, addr(2)).is_err());
        assert_eq!(acl.holder(Role::Owner), addr(1));
    }

    #[test]
    fn accept_from_stable_always_rejects() {
        let mut acl = AccessControl::new(addr(1));
        assert_eq!(acl.accept_ownership(&addr(1)), Err(LedgerError::NoPendingOwner));
        assert_eq!(acl.accept_ownership(&addr(2)), Err(LedgerError::NoPendingOwner));
    }

    #[test]
    fn two_phase_transfer_moves_ownership() {
        let mut acl = AccessControl::new(addr(1));
        acl.propose_owner(&addr(1), addr(2)).unwrap();
        assert_eq!(
            acl.ownership(),
            OwnershipState::PendingTransfer { owner: addr(1), pending: addr(2) }
        );
        // The old owner keeps control until acceptance.
        assert!(acl.check(&addr(1), Role::Owner).is_granted());
        assert!(acl.accept_ownership(&addr(3)).is_err());

        assert_eq!(acl.accept_ownership(&addr(2)), Ok(addr(1)));
        assert_eq!(acl.ownership(), OwnershipState::Stable { owner: addr(2) });
        assert_eq!(acl.ownership().pending(), None);
        assert!(acl.accept_ownership(&addr(2)).is_err());
    }

    #[test]
    fn new_proposal_replaces_pending() {
        let mut acl = AccessControl::new(addr(1));
        acl.propose_owner(&addr(1), addr(2)).unwrap();
        acl.propose_owner(&addr(1), addr(3)).unwrap();
        assert!(acl.accept_ownership(&addr(2)).is_err());
        assert_eq!(acl.accept_ownership(&addr(3)), Ok(addr(1)));
    }

    #[test]
    fn propose_rejects_zero_and_non_owner() {
        let mut acl = AccessControl::new(addr(1));
        assert_eq!(
            acl.propose_owner(&addr(1), Address::ZERO),
            Err(LedgerError::ZeroAddress("pending owner"))
        );
        assert!(acl.propose_owner(&addr(2), addr(2)).is_err());
        assert_eq!(acl.ownership().pending(), None);
    }
}
