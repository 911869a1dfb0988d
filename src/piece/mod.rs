//! Pieces: length selection and digest lists.
//!
//! - [`select_piece_length`] - Chooses the run-wide [`PieceLength`]
//! - [`PieceList`] - Ordered fixed-width piece digests

mod list;
mod size;

pub use list::PieceList;
pub(crate) use list::PieceListBuilder;
pub use size::{N_THRESHOLD, P_CAP, P_MAX, P_MIN, PieceLength, select_piece_length};
