//! Seat map synthesis and seat selection.
//!
//! The cabin layout is fixed — thirty rows of six seats in a 3-3
//! configuration with an aisle between C and D — while occupancy is drawn
//! through the injected [`RandomSource`] once per seat at synthesis time
//! and never recomputed afterwards.

use serde::{Deserialize, Serialize};
use skybook_core::environment::RandomSource;
use std::fmt;

/// Number of rows in the cabin.
pub const ROWS: u32 = 30;

/// Chance that any given seat is already occupied.
const OCCUPANCY_PROBABILITY: f64 = 0.3;

const LEFT_SEATS: [char; 3] = ['A', 'B', 'C'];
const RIGHT_SEATS: [char; 3] = ['D', 'E', 'F'];

/// Seat identifier, `"{row}{letter}"` (e.g. `"12A"`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatId(String);

impl SeatId {
    /// Build the id for a row/letter pair.
    #[must_use]
    pub fn new(row: u32, letter: char) -> Self {
        Self(format!("{row}{letter}"))
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SeatId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One selectable seat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    /// Seat id, `"{row}{letter}"`
    pub id: SeatId,
    /// Seat letter within the row
    pub letter: char,
    /// Taken at synthesis time; occupied seats can never be selected
    pub occupied: bool,
    /// Whether the traveller currently has this seat selected
    pub selected: bool,
}

/// A slot in a row: a seat or the aisle gap.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeatSlot {
    /// A selectable seat
    Seat(Seat),
    /// The aisle between C and D
    Aisle,
}

/// One cabin row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatRow {
    /// Row number, 1-based
    pub number: u32,
    /// Slots in display order: A B C, aisle, D E F
    pub slots: Vec<SeatSlot>,
}

/// The synthesized cabin for the selected flight.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatMap {
    /// Rows in cabin order
    pub rows: Vec<SeatRow>,
}

impl SeatMap {
    /// Synthesize a fresh cabin.
    ///
    /// The shape is deterministic; each seat's occupancy is an independent
    /// 30% draw from the given source, made exactly once.
    #[must_use]
    pub fn synthesize(random: &dyn RandomSource) -> Self {
        let rows = (1..=ROWS)
            .map(|number| {
                let mut slots = Vec::with_capacity(LEFT_SEATS.len() + RIGHT_SEATS.len() + 1);
                for letter in LEFT_SEATS {
                    slots.push(SeatSlot::Seat(Seat {
                        id: SeatId::new(number, letter),
                        letter,
                        occupied: random.next_unit() < OCCUPANCY_PROBABILITY,
                        selected: false,
                    }));
                }
                slots.push(SeatSlot::Aisle);
                for letter in RIGHT_SEATS {
                    slots.push(SeatSlot::Seat(Seat {
                        id: SeatId::new(number, letter),
                        letter,
                        occupied: random.next_unit() < OCCUPANCY_PROBABILITY,
                        selected: false,
                    }));
                }
                SeatRow { number, slots }
            })
            .collect();

        Self { rows }
    }

    /// Look up a seat by id.
    #[must_use]
    pub fn seat(&self, id: &SeatId) -> Option<&Seat> {
        self.rows.iter().find_map(|row| {
            row.slots.iter().find_map(|slot| match slot {
                SeatSlot::Seat(seat) if seat.id == *id => Some(seat),
                _ => None,
            })
        })
    }

    fn seat_mut(&mut self, id: &SeatId) -> Option<&mut Seat> {
        self.rows.iter_mut().find_map(|row| {
            row.slots.iter_mut().find_map(|slot| match slot {
                SeatSlot::Seat(seat) if seat.id == *id => Some(seat),
                _ => None,
            })
        })
    }

    /// Toggle a seat's selection.
    ///
    /// Occupied and unknown seats are ignored. Selecting while already at
    /// `required_seats` capacity evicts the earliest selection (FIFO) so
    /// the selection list never exceeds capacity.
    pub fn toggle(&mut self, id: &SeatId, selected: &mut Vec<SeatId>, required_seats: usize) {
        let Some(seat) = self.seat_mut(id) else {
            return;
        };
        if seat.occupied {
            return;
        }

        if seat.selected {
            seat.selected = false;
            selected.retain(|chosen| chosen != id);
            return;
        }

        if selected.len() >= required_seats && !selected.is_empty() {
            let evicted = selected.remove(0);
            if let Some(oldest) = self.seat_mut(&evicted) {
                oldest.selected = false;
            }
        }

        if let Some(seat) = self.seat_mut(id) {
            seat.selected = true;
        }
        selected.push(id.clone());
    }

    /// Number of selectable (non-aisle) slots in the cabin.
    #[must_use]
    pub fn seat_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| {
                row.slots
                    .iter()
                    .filter(|slot| matches!(slot, SeatSlot::Seat(_)))
                    .count()
            })
            .sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use skybook_testing::SeededRandom;

    /// Random source that marks every seat free or every seat occupied.
    struct ConstantRandom(f64);

    impl RandomSource for ConstantRandom {
        fn next_unit(&self) -> f64 {
            self.0
        }
    }

    fn open_map() -> SeatMap {
        SeatMap::synthesize(&ConstantRandom(0.9))
    }

    #[test]
    fn cabin_shape_is_thirty_rows_of_six_seats_plus_aisle() {
        let map = open_map();

        assert_eq!(map.rows.len(), 30);
        assert_eq!(map.seat_count(), 180);
        for row in &map.rows {
            assert_eq!(row.slots.len(), 7);
            assert!(matches!(row.slots[3], SeatSlot::Aisle));
        }
        assert!(map.seat(&SeatId::from("1A")).is_some());
        assert!(map.seat(&SeatId::from("30F")).is_some());
        assert!(map.seat(&SeatId::from("31A")).is_none());
    }

    #[test]
    fn same_seed_produces_the_same_occupancy() {
        let first = SeatMap::synthesize(&SeededRandom::from_seed(7));
        let second = SeatMap::synthesize(&SeededRandom::from_seed(7));
        let other = SeatMap::synthesize(&SeededRandom::from_seed(8));

        assert_eq!(first, second);
        assert_ne!(first, other);
    }

    #[test]
    fn selecting_beyond_capacity_evicts_the_oldest_seat() {
        let mut map = open_map();
        let mut selected = Vec::new();

        map.toggle(&SeatId::from("1A"), &mut selected, 2);
        map.toggle(&SeatId::from("1B"), &mut selected, 2);
        map.toggle(&SeatId::from("2C"), &mut selected, 2);

        assert_eq!(selected, vec![SeatId::from("1B"), SeatId::from("2C")]);
        assert!(!map.seat(&SeatId::from("1A")).unwrap().selected);
        assert!(map.seat(&SeatId::from("1B")).unwrap().selected);
        assert!(map.seat(&SeatId::from("2C")).unwrap().selected);
    }

    #[test]
    fn toggling_a_selected_seat_deselects_it() {
        let mut map = open_map();
        let mut selected = Vec::new();

        map.toggle(&SeatId::from("5D"), &mut selected, 2);
        map.toggle(&SeatId::from("5D"), &mut selected, 2);

        assert!(selected.is_empty());
        assert!(!map.seat(&SeatId::from("5D")).unwrap().selected);
    }

    #[test]
    fn occupied_seats_cannot_be_selected() {
        let mut map = SeatMap::synthesize(&ConstantRandom(0.1));
        let mut selected = Vec::new();

        map.toggle(&SeatId::from("3A"), &mut selected, 2);

        assert!(selected.is_empty());
        assert!(!map.seat(&SeatId::from("3A")).unwrap().selected);
    }

    proptest! {
        #[test]
        fn selection_never_exceeds_capacity(
            clicks in proptest::collection::vec((1u32..=30, 0usize..6), 0..64),
            required in 1usize..5,
        ) {
            let mut map = open_map();
            let mut selected = Vec::new();
            let letters = ['A', 'B', 'C', 'D', 'E', 'F'];

            for (row, letter_index) in clicks {
                let id = SeatId::new(row, letters[letter_index]);
                map.toggle(&id, &mut selected, required);

                prop_assert!(selected.len() <= required);

                // Selection list and map flags agree, with no duplicates
                let unique: std::collections::HashSet<_> = selected.iter().collect();
                prop_assert_eq!(unique.len(), selected.len());
                for chosen in &selected {
                    prop_assert!(map.seat(chosen).is_some_and(|seat| seat.selected));
                }
            }
        }
    }
}
