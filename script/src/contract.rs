//! Binding for the zkFact contract and the withdraw submission path.
//!
//! The contract instance is always passed in by the caller; nothing here holds
//! a provider of its own.

use alloy::{
    network::{Ethereum, ReceiptResponse as _},
    primitives::{Bytes, TxHash},
    providers::{PendingTransactionBuilder, PendingTransactionError, Provider},
    rpc::types::Log,
    sol,
    sol_types::SolCall,
};
use thiserror::Error;
use tracing::{debug, info, warn};
use zkfact_lib::{Coordinate, MalformedProof, ProofArguments};

// ---------------------------------------------------------------------------
// Contract bindings
// ---------------------------------------------------------------------------

sol! {
    #[sol(rpc)]
    interface IZkFact {
        function withdraw(
            uint256[2] a,
            uint256[2] a_p,
            uint256[2] b1,
            uint256[2] b2,
            uint256[2] b_p,
            uint256[2] c,
            uint256[2] c_p,
            uint256[2] h,
            uint256[2] k
        ) external;

        event PaidOut(string message);
        event Verified(string message);
        event WrongAnswer(string message);
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum WithdrawError {
    /// Rejected locally; nothing was sent.
    #[error(transparent)]
    MalformedProof(#[from] MalformedProof),

    #[error("withdraw submission failed: {0}")]
    Submission(#[from] alloy::contract::Error),

    #[error("withdraw receipt unavailable: {0}")]
    Receipt(#[from] PendingTransactionError),
}

// ---------------------------------------------------------------------------
// Call construction
// ---------------------------------------------------------------------------

/// Build the `withdraw` call with the coordinates in signature order.
pub fn withdraw_call(args: &ProofArguments) -> IZkFact::withdrawCall {
    let [a, a_p, b1, b2, b_p, c, c_p, h, k] = args.to_call_order().map(Coordinate::to_array);
    IZkFact::withdrawCall {
        a,
        a_p,
        b1,
        b2,
        b_p,
        c,
        c_p,
        h,
        k,
    }
}

/// ABI-encoded calldata: 4-byte selector followed by 18 `uint256` words.
pub fn calldata(args: &ProofArguments) -> Bytes {
    Bytes::from(withdraw_call(args).abi_encode())
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// Send `withdraw` through the given contract instance.
///
/// Returns once the node has accepted the transaction. Failures are not
/// retried.
pub async fn submit_withdraw<P: Provider>(
    contract: &IZkFact::IZkFactInstance<P>,
    args: &ProofArguments,
) -> Result<PendingTransactionBuilder<Ethereum>, WithdrawError> {
    let call = withdraw_call(args);
    debug!(contract = %contract.address(), "sending withdraw");
    let pending = contract.call_builder(&call).send().await?;
    info!(tx = %pending.tx_hash(), "withdraw accepted by node");
    Ok(pending)
}

/// Decode `proof_text` and submit it. A malformed proof fails before any RPC
/// request is made.
pub async fn submit_proof<P: Provider>(
    contract: &IZkFact::IZkFactInstance<P>,
    proof_text: &str,
) -> Result<PendingTransactionBuilder<Ethereum>, WithdrawError> {
    let args = zkfact_lib::decode(proof_text)?;
    submit_withdraw(contract, &args).await
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// A message emitted by the contract while handling `withdraw`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Verified(String),
    PaidOut(String),
    WrongAnswer(String),
}

impl Verdict {
    /// Decode the zkFact events in `logs`, in log order. Unrelated logs are
    /// skipped.
    pub fn from_logs(logs: &[Log]) -> Vec<Verdict> {
        logs.iter().filter_map(Verdict::from_log).collect()
    }

    fn from_log(log: &Log) -> Option<Verdict> {
        if let Ok(event) = log.log_decode::<IZkFact::Verified>() {
            return Some(Verdict::Verified(event.inner.data.message));
        }
        if let Ok(event) = log.log_decode::<IZkFact::PaidOut>() {
            return Some(Verdict::PaidOut(event.inner.data.message));
        }
        if let Ok(event) = log.log_decode::<IZkFact::WrongAnswer>() {
            return Some(Verdict::WrongAnswer(event.inner.data.message));
        }
        None
    }
}

#[derive(Clone, Debug)]
pub struct Outcome {
    pub tx_hash: TxHash,
    /// Receipt status; `false` means the transaction reverted.
    pub succeeded: bool,
    pub verdicts: Vec<Verdict>,
}

impl Outcome {
    pub fn paid_out(&self) -> bool {
        self.verdicts
            .iter()
            .any(|v| matches!(v, Verdict::PaidOut(_)))
    }
}

/// Wait for the receipt of a submitted withdraw and collect the contract's
/// verdict events.
pub async fn await_outcome(
    pending: PendingTransactionBuilder<Ethereum>,
) -> Result<Outcome, WithdrawError> {
    let receipt = pending.get_receipt().await?;
    let outcome = Outcome {
        tx_hash: receipt.transaction_hash,
        succeeded: receipt.status(),
        verdicts: Verdict::from_logs(receipt.inner.logs()),
    };

    if !outcome.succeeded {
        warn!(tx = %outcome.tx_hash, "withdraw reverted");
    } else if !outcome.paid_out() {
        warn!(tx = %outcome.tx_hash, "withdraw mined without a payout");
    }
    Ok(outcome)
}
