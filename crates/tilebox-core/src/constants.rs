//! Single source of truth for the engine's shared numeric constants.

/// Distance-sum slack accepted when deciding whether a point lies on a
/// segment: `|P-A| + |P-B|` may exceed `|A-B|` by at most this much.
/// Absorbs floating-point error in intersection results.
pub const SEGMENT_TOLERANCE: f32 = 0.01;

/// Upper bound on cells visited when walking a line across the grid.
/// Guards against degenerate (near-infinite) segments, not concurrency.
pub const LINE_WALK_MAX_STEPS: usize = 1000;

/// Neighbor-window oversize factor. A query rectangle of width `w` scans
/// `max(ceil(w * NEIGHBOR_WINDOW_SCALE), 1)` cells to each side, which
/// guarantees coverage for queries up to 2 cells wide without a spatial
/// tree. Over-inclusive, never under-inclusive.
pub const NEIGHBOR_WINDOW_SCALE: f32 = 2.0;
