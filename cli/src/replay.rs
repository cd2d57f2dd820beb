//! Replay a JSON script of calls against a fresh ledger.
//!
//! A script is a JSON array of steps:
//!
//! ```json
//! [
//!   { "caller": "0x…01", "call": { "mint": { "to": "0x…0a", "amount": 1000000000 } } },
//!   { "caller": "0x…0a", "call": { "transfer": { "to": "0x…0b", "amount": 5 } } }
//! ]
//! ```

use anyhow::{bail, Context};
use gbt_ledger::{Call, Ledger, LedgerEvent, LedgerSummary};
use gbt_types::{format_units, Address};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, Deserialize)]
pub struct Step {
    pub caller: Address,
    pub call: Call,
}

/// What happened to one step.
#[derive(Debug, Serialize)]
pub struct StepOutcome {
    pub index: usize,
    pub op: &'static str,
    pub caller: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<LedgerEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HolderRow {
    pub address: Address,
    pub balance: String,
    pub locked: String,
    pub unlocked: String,
}

#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub applied: usize,
    pub rejected: usize,
    pub steps: Vec<StepOutcome>,
    pub summary: LedgerSummary,
    pub holders: Vec<HolderRow>,
}

pub fn load_steps(path: &Path) -> anyhow::Result<Vec<Step>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read call script {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse call script {}", path.display()))
}

/// Apply `steps` in order. With `fail_fast`, the first rejection aborts the
/// replay with an error.
pub fn replay(
    ledger: &mut Ledger,
    steps: &[Step],
    fail_fast: bool,
) -> anyhow::Result<ReplayReport> {
    let mut outcomes = Vec::with_capacity(steps.len());
    let mut applied = 0;
    let mut rejected = 0;

    for (index, step) in steps.iter().enumerate() {
        let op = step.call.name();
        match ledger.execute(&step.caller, &step.call) {
            Ok(()) => {
                applied += 1;
                let event = ledger.take_events().pop();
                tracing::info!(index, op, caller = %step.caller, "step applied");
                outcomes.push(StepOutcome {
                    index,
                    op,
                    caller: step.caller,
                    event,
                    error: None,
                });
            }
            Err(e) => {
                if fail_fast {
                    bail!("step {index} ({op}) by {} rejected: {e}", step.caller);
                }
                rejected += 1;
                tracing::warn!(index, op, caller = %step.caller, error = %e, "step rejected");
                outcomes.push(StepOutcome {
                    index,
                    op,
                    caller: step.caller,
                    event: None,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    ledger
        .verify_invariants()
        .context("ledger invariants broken after replay")?;

    let holders = ledger
        .holders()
        .into_iter()
        .map(|(address, account)| HolderRow {
            address,
            balance: format_units(account.balance),
            locked: format_units(account.locked),
            unlocked: format_units(account.unlocked()),
        })
        .collect();

    Ok(ReplayReport {
        applied,
        rejected,
        steps: outcomes,
        summary: ledger.summary(),
        holders,
    })
}
