use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    RefreshCandidates,
    RegisterCandidate { name: String, image_path: PathBuf },
    Vote { address: String },
    CheckPinAuth,
    Quit,
}
