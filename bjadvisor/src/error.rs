use thiserror::Error;

/// Failures surfaced by the public table operations. Everything else the
/// table shrugs off as a silent no-op.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TableError {
    /// The cached shoe total and the per-rank counts disagree. This is a
    /// bookkeeping defect, not a reachable game state.
    #[error("shoe total is {total} but rank {rank} still counts {count} cards")]
    ShoeOutOfSync { rank: u8, count: u16, total: u16 },
}
