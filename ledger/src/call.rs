//! Serializable call dispatch.
//!
//! A host runtime (or a replay script) hands the ledger a caller and a
//! [`Call`]; [`Ledger::execute`] routes it to the matching operation.

use crate::error::LedgerError;
use crate::ledger::Ledger;
use gbt_types::Address;
use serde::{Deserialize, Serialize};

/// Every state-changing ledger operation. Amounts are raw units.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Call {
    ProposeOwner { new_owner: Address },
    AcceptOwnership,
    SetMinter { minter: Address },
    SetRedeemer { redeemer: Address },
    SetReleaser { releaser: Address },
    SetDaoFee { bps: u32 },
    SetSecondaryFee { bps: u32 },
    SetDaoWallet { wallet: Address },
    SetSecondaryWallet { wallet: Address },
    Mint { to: Address, amount: u128 },
    Release { account: Address, amount: u128 },
    Transfer { to: Address, amount: u128 },
    Approve { spender: Address, amount: u128 },
    TransferFrom { from: Address, to: Address, amount: u128 },
    Burn { amount: u128 },
    Redeem { account: Address, amount: u128 },
    Blacklist { account: Address },
    Unblacklist { account: Address },
    DestroyBlockedFunds { account: Address },
}

impl Call {
    /// Short operation name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ProposeOwner { .. } => "propose_owner",
            Self::AcceptOwnership => "accept_ownership",
            Self::SetMinter { .. } => "set_minter",
            Self::SetRedeemer { .. } => "set_redeemer",
            Self::SetReleaser { .. } => "set_releaser",
            Self::SetDaoFee { .. } => "set_dao_fee",
            Self::SetSecondaryFee { .. } => "set_secondary_fee",
            Self::SetDaoWallet { .. } => "set_dao_wallet",
            Self::SetSecondaryWallet { .. } => "set_secondary_wallet",
            Self::Mint { .. } => "mint",
            Self::Release { .. } => "release",
            Self::Transfer { .. } => "transfer",
            Self::Approve { .. } => "approve",
            Self::TransferFrom { .. } => "transfer_from",
            Self::Burn { .. } => "burn",
            Self::Redeem { .. } => "redeem",
            Self::Blacklist { .. } => "blacklist",
            Self::Unblacklist { .. } => "unblacklist",
            Self::DestroyBlockedFunds { .. } => "destroy_blocked_funds",
        }
    }
}

impl Ledger {
    /// Run one call on behalf of `caller`.
    pub fn execute(&mut self, caller: &Address, call: &Call) -> Result<(), LedgerError> {
        let result = match call.clone() {
            Call::ProposeOwner { new_owner } => self.propose_owner(caller, new_owner),
            Call::AcceptOwnership => self.accept_ownership(caller),
            Call::SetMinter { minter } => self.set_minter(caller, minter),
            Call::SetRedeemer { redeemer } => self.set_redeemer(caller, redeemer),
            Call::SetReleaser { releaser } => self.set_releaser(caller, releaser),
            Call::SetDaoFee { bps } => self.set_dao_fee(caller, bps),
            Call::SetSecondaryFee { bps } => self.set_secondary_fee(caller, bps),
            Call::SetDaoWallet { wallet } => self.set_dao_wallet(caller, wallet),
            Call::SetSecondaryWallet { wallet } => self.set_secondary_wallet(caller, wallet),
            Call::Mint { to, amount } => self.mint(caller, to, amount),
            Call::Release { account, amount } => self.release(caller, account, amount).map(|_| ()),
            Call::Transfer { to, amount } => self.transfer(caller, to, amount),
            Call::Approve { spender, amount } => self.approve(caller, spender, amount),
            Call::TransferFrom { from, to, amount } => self.transfer_from(caller, from, to, amount),
            Call::Burn { amount } => self.burn(caller, amount),
            Call::Redeem { account, amount } => self.redeem(caller, account, amount),
            Call::Blacklist { account } => self.blacklist(caller, account),
            Call::Unblacklist { account } => self.unblacklist(caller, account),
            Call::DestroyBlockedFunds { account } => {
                self.destroy_blocked_funds(caller, account).map(|_| ())
            }
        };
        if let Err(ref e) = result {
            tracing::debug!(%caller, op = call.name(), error = %e, "call rejected");
        }
        result
    }
}
