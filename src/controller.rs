//! Best-move selection over the game-state tree.
//!
//! The controller is the consumer the tree contracts to: it propagates
//! values over the realized horizon (maximizing on my turns, minimizing on
//! the opponent's), asks the ply manager to selectively deepen the most
//! promising lines, and advances the tree by the choices actually realized
//! at the table.

use std::rc::Rc;

use crate::bone::Bone;
use crate::choice::Choice;
use crate::enumerate::{LayoutEnumerator, StateEnumerator};
use crate::error::{Error, Result};
use crate::evaluate::{ExpectationWeightEvaluator, HandEvaluator};
use crate::game_state::GameState;
use crate::hand_state::HandState;
use crate::ply::{LinearPlyManager, PlyManager};

/// Search driver for one player's side of a dominoes game.
pub struct AiController {
    enumerator: Rc<dyn StateEnumerator>,
    evaluator: Rc<dyn HandEvaluator>,
    ply_manager: Box<dyn PlyManager>,
    deepening_rounds: usize,
    /// The deal's root node. Parent links in the tree are weak, so this
    /// anchor keeps the realized path from the deal to `position` alive.
    root: Option<Rc<GameState>>,
    position: Option<Rc<GameState>>,
}

impl AiController {
    /// Wire a controller from its strategy parts.
    pub fn new(
        enumerator: Rc<dyn StateEnumerator>,
        evaluator: Rc<dyn HandEvaluator>,
        ply_manager: Box<dyn PlyManager>,
    ) -> Self {
        AiController {
            enumerator,
            evaluator,
            ply_manager,
            deepening_rounds: 2,
            root: None,
            position: None,
        }
    }

    /// The baseline probabilistic player: layout-rule enumeration, the
    /// expectation-weight heuristic, and the linear ply policy.
    pub fn probabilistic() -> Self {
        AiController::new(
            Rc::new(LayoutEnumerator),
            Rc::new(ExpectationWeightEvaluator::default()),
            Box::new(LinearPlyManager::default()),
        )
    }

    /// How many selective-deepening passes `best_choice` runs before it
    /// commits to a move.
    pub fn with_deepening_rounds(mut self, rounds: usize) -> Self {
        self.deepening_rounds = rounds;
        self
    }

    /// Start a fresh round: I was dealt `my_bones`, the opponent the same
    /// number of unknown bones, and the first turn is mine iff `is_my_turn`.
    pub fn set_initial_state(&mut self, my_bones: Vec<Bone>, is_my_turn: bool) -> Result<()> {
        let opponent_hand_size = my_bones.len();
        let hand = HandState::new_deal(my_bones, opponent_hand_size)?;
        let root = GameState::new_root(
            Rc::clone(&self.enumerator),
            Rc::clone(&self.evaluator),
            self.ply_manager.initial_ply(),
            hand,
            is_my_turn,
        );
        self.position = Some(Rc::clone(&root));
        self.root = Some(root);
        Ok(())
    }

    fn position(&self) -> Result<&Rc<GameState>> {
        self.position.as_ref().ok_or(Error::NoActiveGame)
    }

    /// The current tree position, if a round is active.
    pub fn game_state(&self) -> Option<&Rc<GameState>> {
        self.position.as_ref()
    }

    /// Pick the best immediate choice from the current position.
    ///
    /// Runs the initial horizon-bounded search, then hands the principal
    /// leaf under each immediate option to the ply manager and re-searches
    /// with the widened horizon for the configured number of rounds.
    ///
    /// # Errors
    ///
    /// [`Error::GameOver`] when the position has no continuation, which is
    /// the round-end signal for the orchestration layer.
    pub fn best_choice(&self) -> Result<Choice> {
        let position = self.position()?;

        for _ in 0..self.deepening_rounds {
            let mut leaves = Vec::new();
            for child in position.child_states()? {
                leaves.push(principal_leaf(&child)?);
            }
            if leaves.is_empty() {
                break;
            }
            let increases = self.ply_manager.ply_increases(&leaves);
            for (leaf, extra) in leaves.iter().zip(increases) {
                leaf.increase_ply(extra);
            }
        }

        let children = position.child_states()?;
        let mut best: Option<(f64, Choice)> = None;
        for child in &children {
            let value = route_value(child)?;
            let better = match best {
                None => true,
                Some((best_value, _)) => {
                    if position.is_my_turn() {
                        value > best_value
                    } else {
                        value < best_value
                    }
                }
            };
            if better && let Some(choice) = child.choice_taken() {
                best = Some((value, choice));
            }
        }

        best.map(|(_, choice)| choice).ok_or(Error::GameOver)
    }

    /// Advance the tree by the choice actually realized at the table; the
    /// caller resolves which physical bone a pickup drew before passing it
    /// in.
    pub fn choose(&mut self, choice: &Choice) -> Result<()> {
        let next = self.position()?.choose(choice)?;
        self.position = Some(next);
        Ok(())
    }

    /// Whether my hand is empty (the round-winning condition).
    pub fn has_empty_hand(&self) -> Result<bool> {
        Ok(self.position()?.hand_state().my_bones().is_empty())
    }

    /// Weight left in my hand, for the orchestration layer's scoring.
    pub fn hand_weight(&self) -> Result<u32> {
        Ok(self.position()?.hand_state().my_hand_weight())
    }
}

/// Minimax value of `node` over its realized horizon: my turns maximize,
/// opponent turns minimize, and frozen or terminal nodes score themselves.
fn route_value(node: &Rc<GameState>) -> Result<f64> {
    let children = node.child_states()?;
    if children.is_empty() {
        return Ok(node.value());
    }
    let mut best = f64::NAN;
    for child in &children {
        let value = route_value(child)?;
        if best.is_nan()
            || (node.is_my_turn() && value > best)
            || (!node.is_my_turn() && value < best)
        {
            best = value;
        }
    }
    Ok(best)
}

/// The leaf at the end of `node`'s principal variation.
fn principal_leaf(node: &Rc<GameState>) -> Result<Rc<GameState>> {
    let children = node.child_states()?;
    if children.is_empty() {
        return Ok(Rc::clone(node));
    }
    let mut best: Option<(f64, Rc<GameState>)> = None;
    for child in &children {
        let value = route_value(child)?;
        let better = match &best {
            None => true,
            Some((best_value, _)) => {
                if node.is_my_turn() {
                    value > *best_value
                } else {
                    value < *best_value
                }
            }
        };
        if better {
            best = Some((value, Rc::clone(child)));
        }
    }
    match best {
        Some((_, child)) => principal_leaf(&child),
        None => Ok(Rc::clone(node)),
    }
}
