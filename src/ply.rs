//! Search-horizon policies.

use std::rc::Rc;

use crate::game_state::GameState;

/// Horizon port: decides how deep the initial search goes and how much to
/// extend the horizon along lines a caller singled out as promising.
///
/// The tree is agnostic to the policy; it only consumes the per-state
/// increases through [`GameState::increase_ply`].
pub trait PlyManager {
    /// Horizon depth granted to a fresh root (inherited by descendants).
    fn initial_ply(&self) -> usize;

    /// One ply increase per selected state, in input order.
    fn ply_increases(&self, selected: &[Rc<GameState>]) -> Vec<usize>;
}

/// Baseline policy: a fixed initial horizon and a flat uniform extension.
#[derive(Debug, Clone, Copy)]
pub struct LinearPlyManager {
    initial: usize,
    step: usize,
}

impl LinearPlyManager {
    pub fn new(initial: usize, step: usize) -> Self {
        LinearPlyManager { initial, step }
    }
}

impl Default for LinearPlyManager {
    fn default() -> Self {
        LinearPlyManager {
            initial: 4,
            step: 2,
        }
    }
}

impl PlyManager for LinearPlyManager {
    fn initial_ply(&self) -> usize {
        self.initial
    }

    fn ply_increases(&self, selected: &[Rc<GameState>]) -> Vec<usize> {
        vec![self.step; selected.len()]
    }
}
