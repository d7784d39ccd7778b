//! The live connection to the voting contract.
//!
//! A handle binds the contract address to a sending account discovered via
//! `eth_accounts` (the node-managed wallet). Construction fails when the
//! node is unreachable or exposes no accounts; callers treat that as an
//! absent handle rather than a fatal error.

use crate::chain::{abi, rpc::RpcClient, ChainError};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

pub const REGISTER_CANDIDATE_SIG: &str = "registerCandidate(string,string)";
pub const VOTE_SIG: &str = "vote(address)";
pub const FETCH_CANDIDATES_SIG: &str = "fetchCandidates()";

/// Read-only copy of one on-chain candidate record, numeric fields already
/// converted from their 256-bit wire representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: u64,
    pub name: String,
    pub total_vote: u64,
    pub image_hash: String,
    pub candidate_address: String,
}

#[derive(Clone)]
pub struct ContractHandle {
    rpc: Arc<RpcClient>,
    address: String,
    from: String,
}

impl ContractHandle {
    pub async fn connect(rpc: Arc<RpcClient>, address: &str) -> Result<Self, ChainError> {
        // Reject a malformed configured address before the first call.
        abi::parse_address(address)?;

        let accounts = rpc.call("eth_accounts", json!([])).await?;
        let from = accounts
            .as_array()
            .and_then(|list| list.first())
            .and_then(|account| account.as_str())
            .ok_or(ChainError::NoAccounts)?
            .to_string();
        debug!(wallet = %from, contract = %address, "contract handle ready");

        Ok(Self {
            rpc,
            address: address.to_string(),
            from,
        })
    }

    pub fn wallet(&self) -> &str {
        &self.from
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Submit a registration transaction. Returns the tx hash; the contract
    /// event, not the receipt, is what refreshes the list.
    pub async fn register_candidate(
        &self,
        name: &str,
        image_ref: &str,
    ) -> Result<String, ChainError> {
        let data = abi::encode_string_pair(REGISTER_CANDIDATE_SIG, name, image_ref);
        self.send_transaction(data).await
    }

    pub async fn vote(&self, candidate_address: &str) -> Result<String, ChainError> {
        let data = abi::encode_address_arg(VOTE_SIG, candidate_address)?;
        self.send_transaction(data).await
    }

    /// Fetch the full candidate set, in contract order.
    pub async fn fetch_candidates(&self) -> Result<Vec<Candidate>, ChainError> {
        let data = abi::selector(FETCH_CANDIDATES_SIG);
        let params = json!([
            { "to": self.address, "data": format!("0x{}", hex::encode(data)) },
            "latest",
        ]);
        let result = self.rpc.call_str("eth_call", params).await?;
        let raw = hex::decode(result.trim_start_matches("0x"))
            .map_err(|e| ChainError::Malformed(format!("eth_call returned bad hex: {e}")))?;
        let candidates = abi::decode_candidates(&raw)?;
        debug!(count = candidates.len(), "fetched candidates");
        Ok(candidates)
    }

    async fn send_transaction(&self, data: Vec<u8>) -> Result<String, ChainError> {
        let params = json!([{
            "from": self.from,
            "to": self.address,
            "data": format!("0x{}", hex::encode(&data)),
        }]);
        self.rpc.call_str("eth_sendTransaction", params).await
    }
}
