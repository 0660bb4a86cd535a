//! Axis set resolution.
//!
//! Expands a configured letter/index list (`"ABC"` + `[3, 4, 5]`, `"XY"` +
//! `[0, 1]`, ...) into a fixed triplet of slots. Slots with no configured
//! axis are *dummy* slots: typed absences that keep the 3-component
//! coordinate vectors valid for collaborators that always expect three.

use std::ops::{Index, IndexMut};

use heapless::{String as FixedString, Vec as FixedVec};
use motion_common::config::ConfigError;
use motion_common::consts::{canonical_letter, MAX_AXES, TRIPLET_LEN};
use tracing::info;

/// Position within a triplet. `X` and `Y` are the coupled pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Slot {
    pub const ALL: [Slot; TRIPLET_LEN] = [Slot::X, Slot::Y, Slot::Z];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Slot for a triplet-local index; `None` past the third slot.
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::X),
            1 => Some(Self::Y),
            2 => Some(Self::Z),
            _ => None,
        }
    }

    /// Letter reported in the status, independent of the configured axes.
    pub const fn status_letter(self) -> char {
        match self {
            Self::X => 'x',
            Self::Y => 'y',
            Self::Z => 'z',
        }
    }
}

/// Fixed-size group of three per-slot values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Triplet<T>(pub [T; TRIPLET_LEN]);

impl<T> Triplet<T> {
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    /// Values paired with their slot, in slot order.
    pub fn iter_slots(&self) -> impl Iterator<Item = (Slot, &T)> {
        Slot::ALL.into_iter().zip(self.0.iter())
    }
}

impl<T> Index<Slot> for Triplet<T> {
    type Output = T;

    fn index(&self, slot: Slot) -> &T {
        &self.0[slot.index()]
    }
}

impl<T> IndexMut<Slot> for Triplet<T> {
    fn index_mut(&mut self, slot: Slot) -> &mut T {
        &mut self.0[slot.index()]
    }
}

/// A configured axis occupying one triplet slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisSlot {
    /// Configured letter, as written in the config (`'A'`).
    pub letter: char,
    /// Global axis index (`3`).
    pub index: usize,
}

/// Validated axis set of one kinematics instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisSet {
    letters: FixedString<TRIPLET_LEN>,
    indices: FixedVec<usize, TRIPLET_LEN>,
    triplet_number: usize,
    slots: Triplet<Option<AxisSlot>>,
}

impl AxisSet {
    /// Validate `letters`/`indices` and place each axis in its slot.
    ///
    /// The triplet is inferred from the first index (`indices[0] / 3`);
    /// every other index must fall in the same triplet.
    pub fn resolve(letters: &str, indices: &[usize]) -> Result<Self, ConfigError> {
        let letter_count = letters.chars().count();
        if letter_count != indices.len() {
            return Err(ConfigError::invalid(format!(
                "the axis indices {indices:?} do not match the count of axis letters '{letters}'"
            )));
        }
        if indices.is_empty() {
            return Err(ConfigError::invalid("at least one axis must be configured"));
        }
        if indices.len() > TRIPLET_LEN {
            return Err(ConfigError::invalid(format!(
                "axis letters '{letters}' exceed one triplet of {TRIPLET_LEN} axes"
            )));
        }

        let triplet_number = indices[0] / TRIPLET_LEN;
        let mut slots: Triplet<Option<AxisSlot>> = Triplet([None; TRIPLET_LEN]);
        let mut fixed_letters: FixedString<TRIPLET_LEN> = FixedString::new();
        let mut fixed_indices: FixedVec<usize, TRIPLET_LEN> = FixedVec::new();

        for (letter, &index) in letters.chars().zip(indices) {
            if !letter.is_ascii_alphabetic() {
                return Err(ConfigError::invalid(format!(
                    "axis letter '{letter}' is not an ASCII letter"
                )));
            }
            if index >= MAX_AXES {
                return Err(ConfigError::invalid(format!(
                    "axis index {index} is beyond the last supported axis {}",
                    MAX_AXES - 1
                )));
            }
            if index / TRIPLET_LEN != triplet_number {
                return Err(ConfigError::invalid(format!(
                    "axis indices {indices:?} span more than one triplet"
                )));
            }
            let slot = Slot::from_index(index % TRIPLET_LEN)
                .ok_or_else(|| ConfigError::invalid(format!("axis index {index} has no slot")))?;
            if slots[slot].is_some() {
                return Err(ConfigError::invalid(format!(
                    "axis index {index} is configured twice in {indices:?}"
                )));
            }
            let upper = letter.to_ascii_uppercase();
            if fixed_letters.chars().any(|c: char| c == upper) {
                return Err(ConfigError::invalid(format!(
                    "axis letter '{letter}' is configured twice in '{letters}'"
                )));
            }
            slots[slot] = Some(AxisSlot {
                letter: upper,
                index,
            });
            fixed_letters
                .push(upper)
                .map_err(|_| ConfigError::invalid("axis letters overflow"))?;
            fixed_indices
                .push(index)
                .map_err(|_| ConfigError::invalid("axis indices overflow"))?;
        }

        let set = Self {
            letters: fixed_letters,
            indices: fixed_indices,
            triplet_number,
            slots,
        };
        info!(
            "Axis set '{}': indices {:?}, triplet {:?}, dummy axes {:?}",
            set.letters(),
            set.indices(),
            set.triplet(),
            set.dummy_axes()
        );
        Ok(set)
    }

    /// Configured letters, uppercase, in configuration order.
    pub fn letters(&self) -> &str {
        self.letters.as_str()
    }

    /// Configured global indices, in configuration order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// 0 for XYZ, 1 for ABC, 2 for UVW.
    pub fn triplet_number(&self) -> usize {
        self.triplet_number
    }

    /// Full triplet of global indices, e.g. `[3, 4, 5]`.
    pub fn triplet(&self) -> [usize; TRIPLET_LEN] {
        let base = TRIPLET_LEN * self.triplet_number;
        [base, base + 1, base + 2]
    }

    pub fn slots(&self) -> &Triplet<Option<AxisSlot>> {
        &self.slots
    }

    /// Slot of a configured global index; `None` for dummy or foreign axes.
    pub fn slot_of(&self, index: usize) -> Option<Slot> {
        self.slots
            .iter_slots()
            .find(|(_, s)| s.is_some_and(|s| s.index == index))
            .map(|(slot, _)| slot)
    }

    /// Global index of a slot, configured or dummy.
    pub fn global_index(&self, slot: Slot) -> usize {
        TRIPLET_LEN * self.triplet_number + slot.index()
    }

    pub fn is_dummy(&self, slot: Slot) -> bool {
        self.slots[slot].is_none()
    }

    /// Letter for a slot: configured letter, or the canonical one for dummies.
    pub fn slot_letter(&self, slot: Slot) -> char {
        match self.slots[slot] {
            Some(axis) => axis.letter,
            None => canonical_letter(self.global_index(slot)).unwrap_or('?'),
        }
    }

    /// Dummy slots as `(global index, canonical letter)`.
    pub fn dummy_axes(&self) -> Vec<(usize, char)> {
        Slot::ALL
            .into_iter()
            .filter(|&slot| self.is_dummy(slot))
            .map(|slot| (self.global_index(slot), self.slot_letter(slot)))
            .collect()
    }
}
