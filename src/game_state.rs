//! The lazily-expanded game-state tree.
//!
//! Each [`GameState`] node owns its realized children, computes its own
//! incremental score through the evaluator, and freezes at the search
//! horizon until the ply manager or real moves widen it. Parent links are
//! weak, so a subtree drops cleanly when its owner lets go of the root.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::choice::{Action, Choice};
use crate::enumerate::StateEnumerator;
use crate::error::{Error, Result};
use crate::evaluate::HandEvaluator;
use crate::hand_state::HandState;

/// Lifecycle of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The search horizon stops here; children have not been built.
    NotYetCalculated,
    /// The horizon allows expansion (children may or may not be realized yet).
    HasChildStates,
    /// Expansion found no continuation: the round is over.
    GameOver,
}

/// Count of moves actually played in the game, shared across one tree.
///
/// Advanced exactly once per realized [`GameState::choose`]; never touched
/// by speculative expansion, which keeps expansion idempotent.
#[derive(Debug)]
pub struct MoveCounter {
    moves_played: Cell<usize>,
    min_ply: usize,
}

impl MoveCounter {
    pub fn new(min_ply: usize) -> Self {
        MoveCounter {
            moves_played: Cell::new(0),
            min_ply,
        }
    }

    pub fn moves_played(&self) -> usize {
        self.moves_played.get()
    }

    pub fn min_ply(&self) -> usize {
        self.min_ply
    }

    fn advance(&self) {
        self.moves_played.set(self.moves_played.get() + 1);
    }
}

/// One ply of the search tree.
///
/// Immutable after construction except for the lazily-cached children, the
/// sticky game-over flag, and the `extra_ply` horizon budget.
pub struct GameState {
    enumerator: Rc<dyn StateEnumerator>,
    evaluator: Rc<dyn HandEvaluator>,
    counter: Rc<MoveCounter>,
    hand: HandState,
    my_turn: bool,
    move_number: usize,
    value: f64,
    choice_taken: Option<Choice>,
    parent: Weak<GameState>,
    extra_ply: Cell<usize>,
    children: RefCell<Option<Vec<Rc<GameState>>>>,
    game_over: Cell<bool>,
}

impl fmt::Debug for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameState")
            .field("hand", &self.hand)
            .field("my_turn", &self.my_turn)
            .field("move_number", &self.move_number)
            .field("value", &self.value)
            .field("choice_taken", &self.choice_taken)
            .field("extra_ply", &self.extra_ply)
            .field("game_over", &self.game_over)
            .finish_non_exhaustive()
    }
}

impl GameState {
    /// Root node for a fresh deal. Allocates the move counter the whole
    /// tree will share; the root's value is the evaluator's initial one.
    pub fn new_root(
        enumerator: Rc<dyn StateEnumerator>,
        evaluator: Rc<dyn HandEvaluator>,
        min_ply: usize,
        hand: HandState,
        is_my_turn: bool,
    ) -> Rc<GameState> {
        let value = evaluator.evaluate_initial_value(&hand);
        Rc::new(GameState {
            enumerator,
            evaluator,
            counter: Rc::new(MoveCounter::new(min_ply)),
            hand,
            my_turn: is_my_turn,
            move_number: 0,
            value,
            choice_taken: None,
            parent: Weak::new(),
            extra_ply: Cell::new(0),
            children: RefCell::new(None),
            game_over: Cell::new(false),
        })
    }

    /// Derive the child reached by the acting player taking `choice`.
    fn spawn_child(self: &Rc<Self>, choice: Choice) -> Result<Rc<GameState>> {
        let hand = self.hand.apply(&choice, self.my_turn)?;
        let prior_choice_was_pass = self
            .choice_taken
            .is_some_and(|taken| taken.action() == Action::Pass);
        let delta = self.evaluator.added_value_from_choice(
            &self.hand,
            self.my_turn,
            prior_choice_was_pass,
            &choice,
        )?;

        Ok(Rc::new(GameState {
            enumerator: Rc::clone(&self.enumerator),
            evaluator: Rc::clone(&self.evaluator),
            counter: Rc::clone(&self.counter),
            hand,
            my_turn: !self.my_turn,
            move_number: self.move_number + 1,
            value: self.value + delta,
            choice_taken: Some(choice),
            parent: Rc::downgrade(self),
            extra_ply: Cell::new(self.extra_ply.get().saturating_sub(1)),
            children: RefCell::new(None),
            game_over: Cell::new(false),
        }))
    }

    /// Current status, derived on demand.
    ///
    /// Game over is sticky once expansion established it. Otherwise the
    /// node may expand iff the horizon (`moves played + min ply + extra
    /// ply`) still exceeds its move index.
    pub fn status(&self) -> Status {
        if self.game_over.get() {
            return Status::GameOver;
        }
        let horizon = self.counter.moves_played() + self.counter.min_ply() + self.extra_ply.get();
        if horizon > self.move_number {
            Status::HasChildStates
        } else {
            Status::NotYetCalculated
        }
    }

    /// Lazily build the children, at most once, and never past the horizon.
    fn expand(self: &Rc<Self>) -> Result<()> {
        if self.children.borrow().is_some() || self.status() != Status::HasChildStates {
            return Ok(());
        }

        let choices = self.enumerator.valid_choices(&self.hand, self.my_turn);
        let mut children = Vec::with_capacity(choices.len());
        for choice in choices {
            children.push(self.spawn_child(choice)?);
        }

        // Termination overrides, checked regardless of what was enumerated:
        // a second pass in a row, or either hand emptying, ends the round.
        let second_pass_in_a_row = self
            .choice_taken
            .is_some_and(|taken| taken.action() == Action::Pass)
            && self
                .parent
                .upgrade()
                .and_then(|parent| parent.choice_taken)
                .is_some_and(|taken| taken.action() == Action::Pass);

        if second_pass_in_a_row
            || self.hand.opponent_hand_size() == 0
            || self.hand.my_bones().is_empty()
        {
            children.clear();
        }

        if children.is_empty() {
            self.game_over.set(true);
        }
        *self.children.borrow_mut() = Some(children);
        Ok(())
    }

    /// The realized children, expanding lazily if the horizon allows.
    ///
    /// Horizon-frozen nodes return an empty list without caching anything,
    /// so a later [`increase_ply`](Self::increase_ply) or real move can
    /// still expand them.
    pub fn child_states(self: &Rc<Self>) -> Result<Vec<Rc<GameState>>> {
        self.expand()?;
        Ok(self.children.borrow().clone().unwrap_or_default())
    }

    /// Advance the tree by the choice actually realized at the table.
    ///
    /// Resolves to the matching realized child if one exists; an
    /// unexpanded node materializes exactly the chosen child, without
    /// forcing its siblings. A pickup resolved against the true boneyard
    /// matches the unresolved pickup line and is rebuilt with the bone
    /// bound. Advances the shared move counter exactly once on success.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidChoice`] with full diagnostics when the choice is
    /// not currently valid; this is a calling-contract violation.
    pub fn choose(self: &Rc<Self>, choice: &Choice) -> Result<Rc<GameState>> {
        let mut chosen = self
            .children
            .borrow()
            .as_deref()
            .and_then(|children| {
                children
                    .iter()
                    .find(|child| child.choice_taken == Some(*choice))
                    .cloned()
            });

        if chosen.is_none() && !self.game_over.get() {
            let valid = self.enumerator.valid_choices(&self.hand, self.my_turn);
            let acceptable = valid.contains(choice)
                || (choice.action() == Action::PickedUp
                    && choice.bone().is_some()
                    && valid.contains(&Choice::pick_up()));
            if acceptable {
                chosen = Some(self.spawn_child(*choice)?);
            }
        }

        let Some(chosen) = chosen else {
            return Err(self.invalid_choice_error(choice));
        };
        self.counter.advance();
        Ok(chosen)
    }

    /// Widen this node's future horizon by `extra` plies.
    pub fn increase_ply(&self, extra: usize) {
        self.extra_ply.set(self.extra_ply.get() + extra);
    }

    /// Running heuristic value: the root's initial evaluation plus the sum
    /// of incremental deltas along the path from the root.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The choice that produced this node from its parent; `None` at the root.
    pub fn choice_taken(&self) -> Option<Choice> {
        self.choice_taken
    }

    /// Whether the next move at this node is mine.
    pub fn is_my_turn(&self) -> bool {
        self.my_turn
    }

    /// Non-owning parent link; `None` at the root or once the parent dropped.
    pub fn parent(&self) -> Option<Rc<GameState>> {
        self.parent.upgrade()
    }

    pub fn hand_state(&self) -> &HandState {
        &self.hand
    }

    /// Depth from the root in realized plies.
    pub fn move_number(&self) -> usize {
        self.move_number
    }

    pub fn extra_ply(&self) -> usize {
        self.extra_ply.get()
    }

    /// The move counter shared across this node's whole tree.
    pub fn move_counter(&self) -> &MoveCounter {
        &self.counter
    }

    fn invalid_choice_error(&self, attempted: &Choice) -> Error {
        let realized_children = self.children.borrow().as_ref().map_or(0, Vec::len);
        let alternatives = self
            .enumerator
            .valid_choices(&self.hand, self.my_turn)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Error::InvalidChoice {
            attempted: attempted.to_string(),
            alternatives,
            status: self.status(),
            realized_children,
            hand: self.hand.to_string(),
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let actor = if self.my_turn { "opponent" } else { "I" };
        let taken = match self.choice_taken {
            Some(choice) => choice.to_string(),
            None => "dealt".to_string(),
        };
        write!(
            f,
            "{actor} {taken}, now value = {:.1}, i have {}, opponent has {}, boneyard has {}",
            self.value,
            self.hand.my_bones().len(),
            self.hand.opponent_hand_size(),
            self.hand.boneyard_size(),
        )
    }
}
