//! Probabilistic decision engine for two-player dominoes
//!
//! This crate provides:
//! - Immutable value types for tiles ([`Bone`]) and moves ([`Choice`])
//! - A hidden-information hand tracker deriving opponent-possession
//!   probabilities ([`HandState`])
//! - Legal-move enumeration against the open layout ([`LayoutEnumerator`])
//! - A probability-weighted incremental heuristic
//!   ([`ExpectationWeightEvaluator`])
//! - A lazily-expanded game-state tree with a selective search horizon
//!   ([`GameState`], [`LinearPlyManager`])
//! - A search driver that picks the best immediate move ([`AiController`])
//!
//! The enumerator, evaluator, and ply policy are trait seams, so rule
//! variants and alternative heuristics can be swapped without touching the
//! tree logic.

pub mod bone;
pub mod choice;
pub mod controller;
pub mod enumerate;
pub mod error;
pub mod evaluate;
pub mod game_state;
pub mod hand_state;
pub mod ply;

pub use bone::Bone;
pub use choice::{Action, Choice};
pub use controller::AiController;
pub use enumerate::{LayoutEnumerator, StateEnumerator};
pub use error::{Error, Result};
pub use evaluate::{EvaluatorConfig, ExpectationWeightEvaluator, HandEvaluator};
pub use game_state::{GameState, MoveCounter, Status};
pub use hand_state::{HandState, Layout};
pub use ply::{LinearPlyManager, PlyManager};
