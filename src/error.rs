//! Error types for the dominoes engine

use thiserror::Error;

use crate::game_state::Status;

/// Main error type for the dominoes engine.
///
/// Every variant is a calling-contract violation rather than an expected
/// runtime condition; callers should abort the current turn with the
/// attached diagnostics instead of retrying.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("pip count {pips} is out of range (must be 0-6)")]
    InvalidPip { pips: u8 },

    #[error(
        "choice was not valid: {attempted}\n\
         valid choices were: [{alternatives}]\n\
         status was {status:?} with {realized_children} realized children\n\
         hand state: {hand}"
    )]
    InvalidChoice {
        attempted: String,
        alternatives: String,
        status: Status,
        realized_children: usize,
        hand: String,
    },

    #[error("evaluator cannot score malformed choice: {choice}")]
    UnhandledChoice { choice: String },

    #[error("tried to draw from an empty boneyard")]
    EmptyBoneyard,

    #[error("bone {bone} is not in my hand")]
    BoneNotInHand { bone: String },

    #[error("bone {bone} is not among the unknown bones")]
    BoneNotUnknown { bone: String },

    #[error("bone {bone} matches neither pip value of the open {end} end ({pips})")]
    NoMatchingEnd {
        bone: String,
        end: &'static str,
        pips: u8,
    },

    #[error("opponent hand is already empty")]
    OpponentHandEmpty,

    #[error("duplicate bone {bone} in dealt hand")]
    DuplicateBone { bone: String },

    #[error("dealt sizes exceed the double-six set: {my_bones} in hand, {opponent} opponent")]
    OversizedDeal { my_bones: usize, opponent: usize },

    #[error("game is over: no further choices exist")]
    GameOver,

    #[error("no active game: call set_initial_state first")]
    NoActiveGame,
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;
