use thiserror::Error;

/// Why a road segment couldn't produce any geometry. One bad segment never aborts a batch; these
/// are counted and reported instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Degenerate {
    #[error("centerline has {0} points, need at least 2")]
    TooFewPoints(usize),

    #[error("centerline point {0} repeats the previous one")]
    RepeatedPoint(usize),

    #[error("every half-width is zero")]
    ZeroWidth,

    #[error("segment has no density values")]
    NoDensities,
}
