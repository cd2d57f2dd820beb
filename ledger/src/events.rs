//! Change notifications emitted by successful ledger calls.

use crate::fees::FeeKind;
use gbt_types::{Address, Role};
use serde::Serialize;

/// One notification per committed call. Rejected calls emit nothing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    Transfer {
        from: Address,
        to: Address,
        amount: u128,
    },
    Approval {
        owner: Address,
        spender: Address,
        amount: u128,
    },
    /// Immediate-fee mint with its fee breakdown.
    Minted {
        to: Address,
        amount: u128,
        dao_fee: u128,
        secondary_fee: u128,
    },
    /// Lock-then-release mint: the full amount was credited locked.
    Locked {
        account: Address,
        amount: u128,
    },
    Released {
        account: Address,
        amount: u128,
        dao_fee: u128,
        secondary_fee: u128,
    },
    Burned {
        account: Address,
        amount: u128,
    },
    Redeemed {
        account: Address,
        redeemer: Address,
        amount: u128,
    },
    OwnershipTransferStarted {
        owner: Address,
        pending: Address,
    },
    OwnershipTransferred {
        previous: Address,
        owner: Address,
    },
    RoleChanged {
        role: Role,
        old: Address,
        new: Address,
    },
    FeeChanged {
        kind: FeeKind,
        old: u32,
        new: u32,
    },
    FeeWalletChanged {
        kind: FeeKind,
        old: Address,
        new: Address,
    },
    Blacklisted {
        account: Address,
    },
    Unblacklisted {
        account: Address,
    },
    BlockedFundsDestroyed {
        account: Address,
        amount: u128,
        locked: u128,
    },
}

/// Synchronous fan-out event bus.
///
/// Listeners run inline on the calling thread, after the state change is
/// committed.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&LedgerEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&LedgerEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &LedgerEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
