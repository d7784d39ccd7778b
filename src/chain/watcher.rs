use crate::app::event::{AppEvent, ContractEventKind};
use crate::chain::{abi, rpc::RpcClient, ChainError};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Guard for the background log-watching task. Dropping it (handle teardown,
/// shutdown) aborts the task, releasing the subscription unconditionally.
pub struct EventWatcher {
    task: tokio::task::JoinHandle<()>,
}

impl Drop for EventWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Watch the contract's log stream and forward recognized events.
///
/// Installs an `eth_newFilter` scoped to the contract address and polls
/// `eth_getFilterChanges` on the given interval. Logs whose topic0 matches
/// one of the two subscribed event signatures become
/// [`AppEvent::ContractEvent`]s; anything else from the contract is ignored.
/// The payload is never decoded — events are pure refresh triggers.
pub fn spawn_watcher(
    rpc: Arc<RpcClient>,
    contract_address: String,
    created_sig: String,
    voted_sig: String,
    poll_interval: Duration,
    event_tx: mpsc::UnboundedSender<AppEvent>,
) -> EventWatcher {
    let task = tokio::spawn(async move {
        let created_topic = format!("0x{}", hex::encode(abi::event_topic(&created_sig)));
        let voted_topic = format!("0x{}", hex::encode(abi::event_topic(&voted_sig)));

        let mut filter_id: Option<String> = None;
        let mut interval = tokio::time::interval(poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            if filter_id.is_none() {
                match install_filter(&rpc, &contract_address).await {
                    Ok(id) => {
                        debug!(filter = %id, "installed contract log filter");
                        filter_id = Some(id);
                    }
                    Err(e) => {
                        warn!(error = %e, "could not install log filter");
                        continue;
                    }
                }
            }
            let Some(id) = filter_id.as_deref() else {
                continue;
            };

            match rpc.call("eth_getFilterChanges", json!([id])).await {
                Ok(Value::Array(logs)) => {
                    for log in logs {
                        let topic0 = log
                            .get("topics")
                            .and_then(|topics| topics.get(0))
                            .and_then(|topic| topic.as_str())
                            .unwrap_or_default();
                        let kind = if topic0.eq_ignore_ascii_case(&created_topic) {
                            ContractEventKind::CandidateCreated
                        } else if topic0.eq_ignore_ascii_case(&voted_topic) {
                            ContractEventKind::Voted
                        } else {
                            debug!(topic = topic0, "ignoring unsubscribed log topic");
                            continue;
                        };
                        if event_tx.send(AppEvent::ContractEvent { kind }).is_err() {
                            return;
                        }
                    }
                }
                Ok(other) => {
                    warn!(?other, "unexpected eth_getFilterChanges result");
                }
                Err(e) => {
                    // Node-side filters expire; reinstall on the next poll.
                    warn!(error = %e, "log poll failed");
                    filter_id = None;
                }
            }
        }
    });

    EventWatcher { task }
}

async fn install_filter(rpc: &RpcClient, address: &str) -> Result<String, ChainError> {
    rpc.call_str("eth_newFilter", json!([{ "address": address }]))
        .await
}
