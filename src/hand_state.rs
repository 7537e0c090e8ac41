//! Known/unknown tile bookkeeping from the searching player's perspective.
//!
//! A [`HandState`] tracks the bones I hold (fully known), the count of bones
//! the opponent holds (identities unknown), the size of the boneyard, the
//! pool of unknown bones that could be in either, and the open ends of the
//! layout. Applying a [`Choice`] produces a fresh state; nothing is shared
//! or mutated in place, so speculative search can branch freely.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bone::{Bone, SET_SIZE};
use crate::choice::{Action, Choice};
use crate::error::{Error, Result};

/// The open ends of the domino layout.
///
/// Empty before the first placement; afterwards carries the left and right
/// pip values a placement must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Layout {
    ends: Option<(u8, u8)>,
}

impl Layout {
    /// The layout before any bone has been placed.
    pub fn empty() -> Self {
        Layout { ends: None }
    }

    pub fn is_empty(&self) -> bool {
        self.ends.is_none()
    }

    /// Left and right open pip values, if any bone has been placed.
    pub fn ends(&self) -> Option<(u8, u8)> {
        self.ends
    }

    pub fn left(&self) -> Option<u8> {
        self.ends.map(|(left, _)| left)
    }

    pub fn right(&self) -> Option<u8> {
        self.ends.map(|(_, right)| right)
    }

    /// The layout after placing `bone` on the given side.
    ///
    /// The first placement opens both ends with the bone's own pips.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoMatchingEnd`] if the bone fits neither pip of the
    /// targeted end.
    fn place(&self, bone: Bone, action: Action) -> Result<Layout> {
        debug_assert!(action.is_placement());
        let Some((left, right)) = self.ends else {
            return Ok(Layout {
                ends: Some((bone.low(), bone.high())),
            });
        };

        let ends = match action {
            Action::PlacedLeft => {
                if !bone.has_end(left) {
                    return Err(Error::NoMatchingEnd {
                        bone: bone.to_string(),
                        end: "left",
                        pips: left,
                    });
                }
                (bone.other_end(left), right)
            }
            Action::PlacedRight => {
                if !bone.has_end(right) {
                    return Err(Error::NoMatchingEnd {
                        bone: bone.to_string(),
                        end: "right",
                        pips: right,
                    });
                }
                (left, bone.other_end(right))
            }
            Action::PickedUp | Action::Pass => (left, right),
        };
        Ok(Layout { ends: Some(ends) })
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ends {
            Some((left, right)) => write!(f, "{left}=...={right}"),
            None => write!(f, "empty"),
        }
    }
}

/// Hidden-information hand tracker for one player's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandState {
    my_bones: Vec<Bone>,
    unknown_bones: Vec<Bone>,
    opponent_hand_size: usize,
    boneyard_size: usize,
    layout: Layout,
}

impl HandState {
    /// Build the state for a fresh deal: I hold `my_bones`, the opponent
    /// holds `opponent_hand_size` unidentified bones, and the rest of the
    /// double-six set sits in the boneyard.
    ///
    /// # Errors
    ///
    /// Rejects duplicate bones in the dealt hand and deals that exceed the
    /// 28-bone set.
    pub fn new_deal(my_bones: Vec<Bone>, opponent_hand_size: usize) -> Result<Self> {
        for (i, bone) in my_bones.iter().enumerate() {
            if my_bones[..i].contains(bone) {
                return Err(Error::DuplicateBone {
                    bone: bone.to_string(),
                });
            }
        }
        if my_bones.len() + opponent_hand_size > SET_SIZE {
            return Err(Error::OversizedDeal {
                my_bones: my_bones.len(),
                opponent: opponent_hand_size,
            });
        }

        let unknown_bones: Vec<Bone> = Bone::all()
            .into_iter()
            .filter(|bone| !my_bones.contains(bone))
            .collect();
        let boneyard_size = unknown_bones.len() - opponent_hand_size;

        Ok(HandState {
            my_bones,
            unknown_bones,
            opponent_hand_size,
            boneyard_size,
            layout: Layout::empty(),
        })
    }

    /// Bones I hold, fully known.
    pub fn my_bones(&self) -> &[Bone] {
        &self.my_bones
    }

    /// Bones that could be in the opponent's hand or the boneyard.
    pub fn unknown_bones(&self) -> &[Bone] {
        &self.unknown_bones
    }

    pub fn opponent_hand_size(&self) -> usize {
        self.opponent_hand_size
    }

    pub fn boneyard_size(&self) -> usize {
        self.boneyard_size
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Probability that the opponent holds any one specific unknown bone.
    ///
    /// Zero when both the opponent hand and the boneyard are empty.
    pub fn prob_opponent_holds(&self) -> f64 {
        let pool = self.opponent_hand_size + self.boneyard_size;
        if pool == 0 {
            0.0
        } else {
            self.opponent_hand_size as f64 / pool as f64
        }
    }

    /// Total weight of the bones I hold.
    pub fn my_hand_weight(&self) -> u32 {
        self.my_bones.iter().map(Bone::weight).sum()
    }

    /// Total weight of the unknown pool.
    pub fn unknown_weight(&self) -> u32 {
        self.unknown_bones.iter().map(Bone::weight).sum()
    }

    /// The state after the acting player takes `choice`.
    ///
    /// Pure transition: `self` is untouched and a fresh state comes back.
    /// A pickup by me with a bound bone moves that bone into my hand; an
    /// unresolved pickup (search speculation) only shrinks the boneyard,
    /// leaving the drawn bone abstract. An opponent pickup moves one
    /// unidentified bone from the boneyard into the opponent's hand.
    ///
    /// # Errors
    ///
    /// Placement of a bone the acting player cannot hold, placement that
    /// matches no open end, and drawing from an empty boneyard are contract
    /// violations and fail hard.
    pub fn apply(&self, choice: &Choice, was_my_turn: bool) -> Result<HandState> {
        let mut next = self.clone();

        match choice.action() {
            Action::PlacedLeft | Action::PlacedRight => {
                let bone = choice.bone().ok_or_else(|| Error::UnhandledChoice {
                    choice: choice.to_string(),
                })?;
                next.layout = self.layout.place(bone, choice.action())?;
                if was_my_turn {
                    next.remove_my_bone(&bone)?;
                } else {
                    next.remove_unknown_bone(&bone)?;
                    if next.opponent_hand_size == 0 {
                        return Err(Error::OpponentHandEmpty);
                    }
                    next.opponent_hand_size -= 1;
                }
            }
            Action::PickedUp => {
                if self.boneyard_size == 0 {
                    return Err(Error::EmptyBoneyard);
                }
                next.boneyard_size -= 1;
                if was_my_turn {
                    if let Some(bone) = choice.bone() {
                        next.remove_unknown_bone(&bone)?;
                        next.my_bones.push(bone);
                    }
                } else {
                    next.opponent_hand_size += 1;
                }
            }
            Action::Pass => {}
        }

        Ok(next)
    }

    fn remove_my_bone(&mut self, bone: &Bone) -> Result<()> {
        let position = self
            .my_bones
            .iter()
            .position(|held| held == bone)
            .ok_or_else(|| Error::BoneNotInHand {
                bone: bone.to_string(),
            })?;
        self.my_bones.remove(position);
        Ok(())
    }

    fn remove_unknown_bone(&mut self, bone: &Bone) -> Result<()> {
        let position = self
            .unknown_bones
            .iter()
            .position(|unknown| unknown == bone)
            .ok_or_else(|| Error::BoneNotUnknown {
                bone: bone.to_string(),
            })?;
        self.unknown_bones.remove(position);
        Ok(())
    }
}

impl fmt::Display for HandState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "my hand [{}], opponent holds {}, boneyard {}, unknown [{}], layout {}",
            join_bones(&self.my_bones),
            self.opponent_hand_size,
            self.boneyard_size,
            join_bones(&self.unknown_bones),
            self.layout,
        )
    }
}

fn join_bones(bones: &[Bone]) -> String {
    bones
        .iter()
        .map(Bone::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
