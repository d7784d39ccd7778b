use crate::chain::contract::Candidate;
use crossterm::event::Event as CrosstermEvent;

/// The two contract events this client subscribes to. Payloads are never
/// decoded; both are pure triggers for a candidate refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractEventKind {
    CandidateCreated,
    Voted,
}

impl ContractEventKind {
    pub fn label(self) -> &'static str {
        match self {
            ContractEventKind::CandidateCreated => "candidateCreated",
            ContractEventKind::Voted => "Voted",
        }
    }
}

#[derive(Debug)]
pub enum AppEvent {
    /// Terminal input event
    Terminal(CrosstermEvent),

    /// Contract handle became usable
    HandleReady { wallet: String },

    /// Contract emitted one of the subscribed events
    ContractEvent { kind: ContractEventKind },

    /// A candidate fetch settled
    CandidatesFetched { candidates: Vec<Candidate> },
    FetchFailed { error: String },

    /// Registration flow settled (upload + transaction)
    RegisterSubmitted { name: String, tx_hash: String },
    RegisterFailed { error: String },

    /// Vote transaction settled
    VoteSubmitted { address: String, tx_hash: String },
    VoteFailed { address: String, error: String },

    /// Pinning credential check settled
    PinAuthChecked { error: Option<String> },

    /// Tick for UI refresh
    Tick,
}
