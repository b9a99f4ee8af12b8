use std::sync::Arc;

use crate::ServiceResult;

pub use swiss_core::{MatchId, MatchRecord};

use swiss_core::TournamentId;

pub type ArcMatchRepository = Arc<Box<dyn MatchRepository + Send + Sync + 'static>>;

/// Append-only ledger of reported matches. Rows are never updated.
pub trait MatchRepository {
    fn record_match(&self, record: &MatchRecord) -> ServiceResult<MatchId>;
    /// All matches of a tournament in the order they were recorded.
    fn list_matches(&self, tournament_id: TournamentId) -> ServiceResult<Vec<MatchRecord>>;
    fn delete_matches(&self) -> ServiceResult<()>;
}
