//! Piece length selection.

use std::fmt;

/// Smallest piece length ever chosen (256 KiB).
pub const P_MIN: u64 = 256 * 1024;

/// Ceiling for the size-derived piece length (4 MiB).
pub const P_CAP: u64 = 4 * 1024 * 1024;

/// Largest piece length ever chosen (64 MiB).
pub const P_MAX: u64 = 64 * 1024 * 1024;

/// Piece count above which the piece length is stepped up.
pub const N_THRESHOLD: u64 = 7500;

/// The piece length shared by both documents of a run.
///
/// Always a power of two in `[P_MIN, P_MAX]`. The only way to obtain one is
/// [`select_piece_length`], so both documents agree on it by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PieceLength(u64);

impl PieceLength {
    /// Returns the piece length in bytes.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Number of pieces needed to cover `total` bytes.
    pub const fn pieces_for(self, total: u64) -> u64 {
        total.div_ceil(self.0)
    }
}

impl Default for PieceLength {
    fn default() -> Self {
        Self(P_MIN)
    }
}

impl fmt::Display for PieceLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Chooses the piece length for a run from its total content size.
///
/// Small inputs get `P_MIN` pieces (useful for range checks); the length
/// grows with `total / 1024` up to `P_CAP`; inputs that would still need more
/// than `N_THRESHOLD` pieces are stepped up to the power of two nearest below
/// `total / N_THRESHOLD`, clamped to `[P_CAP, P_MAX]`.
///
/// # Example
///
/// ```
/// use metapack::{select_piece_length, P_MIN};
///
/// assert_eq!(select_piece_length(0).get(), P_MIN);
/// assert_eq!(select_piece_length(1 << 30).get(), 1 << 20);
/// ```
pub fn select_piece_length(total_bytes: u64) -> PieceLength {
    if total_bytes == 0 {
        return PieceLength(P_MIN);
    }

    // 2^(floor(log2(total)) - 10), which is below P_MIN for anything under 256 MiB
    let base = match total_bytes.ilog2().checked_sub(10) {
        Some(exp) => (1u64 << exp).max(P_MIN),
        None => P_MIN,
    };
    let mut current = base.min(P_CAP);

    if total_bytes > N_THRESHOLD * current {
        let target = total_bytes / N_THRESHOLD;
        current = (1u64 << target.ilog2()).clamp(P_CAP, P_MAX);
    }

    PieceLength(current.max(P_MIN))
}
