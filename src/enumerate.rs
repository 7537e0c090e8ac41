//! Legal-move enumeration against the open layout.

use crate::choice::Choice;
use crate::hand_state::HandState;

/// Enumeration port: produces the legal choices for whoever acts next.
///
/// Implementations must be deterministic: identical hand states yield the
/// same set of choices, stably ordered, so choices can be matched by
/// equality during move selection.
pub trait StateEnumerator {
    /// All legal choices from `hand` for the acting player.
    ///
    /// On my turn the acting hand is the known set of my bones; on the
    /// opponent's turn it is the whole unknown pool, since any unknown
    /// bone might be theirs.
    fn valid_choices(&self, hand: &HandState, is_my_turn: bool) -> Vec<Choice>;
}

/// Baseline enumerator implementing draw-dominoes placement rules.
///
/// One placement choice per acting-hand bone per open end it matches. On
/// my turn I must place when I can, so a single unresolved pickup (or a
/// pass once the boneyard is dry) appears only when no placement is
/// legal. On the opponent's turn the placements are speculative: any
/// matching unknown bone might be theirs, but they might equally hold
/// nothing that fits, so the pickup (or pass) line stays valid alongside
/// the placements.
#[derive(Debug, Default, Clone, Copy)]
pub struct LayoutEnumerator;

impl StateEnumerator for LayoutEnumerator {
    fn valid_choices(&self, hand: &HandState, is_my_turn: bool) -> Vec<Choice> {
        let acting = if is_my_turn {
            hand.my_bones()
        } else {
            hand.unknown_bones()
        };

        let mut choices = Vec::new();
        match hand.layout().ends() {
            // First placement: left and right are interchangeable on an
            // empty layout, so one choice per bone is enough.
            None => {
                for &bone in acting {
                    choices.push(Choice::place_left(bone));
                }
            }
            Some((left, right)) => {
                for &bone in acting {
                    if bone.has_end(left) {
                        choices.push(Choice::place_left(bone));
                    }
                    if bone.has_end(right) {
                        choices.push(Choice::place_right(bone));
                    }
                }
            }
        }

        // An opened layout never tells us whether the opponent can really
        // place, so their draw/pass line stays open; an empty layout means
        // any held bone places, for either player.
        if choices.is_empty() || (!is_my_turn && !hand.layout().is_empty()) {
            if hand.boneyard_size() > 0 {
                choices.push(Choice::pick_up());
            } else {
                choices.push(Choice::pass());
            }
        }

        choices
    }
}
