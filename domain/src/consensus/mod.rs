//! Tournament consensus domain.
//!
//! A tournament fans one prompt out to several models; the consensus
//! detector merges their heterogeneous findings into agreed issues
//! (support at or above a threshold) and disputed issues (below it,
//! surfaced for human review rather than treated as fact).

pub mod detector;
pub mod issue;
pub mod parsing;
pub mod tournament;

pub use detector::{DEFAULT_AGREEMENT_THRESHOLD, detect};
pub use issue::{ConsensusIssue, ModelFinding, Verdict};
pub use parsing::extract_findings;
pub use tournament::{InvocationStatus, ParticipantResult, QUORUM_MINIMUM, TournamentRun};
