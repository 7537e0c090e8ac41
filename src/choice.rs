//! Atomic legal actions and their value type.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bone::Bone;

/// The kind of action a [`Choice`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    PlacedLeft,
    PlacedRight,
    PickedUp,
    Pass,
}

impl Action {
    /// Whether this action places a bone on the layout.
    pub fn is_placement(self) -> bool {
        matches!(self, Action::PlacedLeft | Action::PlacedRight)
    }
}

/// An atomic legal action: place a bone left or right, pick up, or pass.
///
/// The bone is absent for a pass and for a pickup that has not yet been
/// resolved against the true boneyard. Equality is structural, so a
/// resolved pickup does not equal an unresolved one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Choice {
    action: Action,
    bone: Option<Bone>,
}

impl Choice {
    /// Place `bone` on the left end of the layout.
    pub fn place_left(bone: Bone) -> Self {
        Choice {
            action: Action::PlacedLeft,
            bone: Some(bone),
        }
    }

    /// Place `bone` on the right end of the layout.
    pub fn place_right(bone: Bone) -> Self {
        Choice {
            action: Action::PlacedRight,
            bone: Some(bone),
        }
    }

    /// Draw from the boneyard; the drawn bone is not yet known.
    pub fn pick_up() -> Self {
        Choice {
            action: Action::PickedUp,
            bone: None,
        }
    }

    /// Draw from the boneyard, resolved to the specific bone drawn.
    pub fn pick_up_bone(bone: Bone) -> Self {
        Choice {
            action: Action::PickedUp,
            bone: Some(bone),
        }
    }

    /// Pass the turn.
    pub fn pass() -> Self {
        Choice {
            action: Action::Pass,
            bone: None,
        }
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn bone(&self) -> Option<Bone> {
        self.bone
    }

    /// Whether this is a pickup whose drawn bone is still unknown.
    pub fn is_unresolved_pickup(&self) -> bool {
        self.action == Action::PickedUp && self.bone.is_none()
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.action, self.bone) {
            (Action::PlacedLeft, Some(bone)) => write!(f, "placed {bone} left"),
            (Action::PlacedLeft, None) => write!(f, "placed <unbound> left"),
            (Action::PlacedRight, Some(bone)) => write!(f, "placed {bone} right"),
            (Action::PlacedRight, None) => write!(f, "placed <unbound> right"),
            (Action::PickedUp, Some(bone)) => write!(f, "picked up {bone}"),
            (Action::PickedUp, None) => write!(f, "picked up"),
            (Action::Pass, _) => write!(f, "passed"),
        }
    }
}
