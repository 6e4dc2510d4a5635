use std::collections::BTreeMap;
use std::fmt;

use crate::{Cell, Color, SeatSet, SlotPalette};

pub type SlotId = u32;

#[derive(Debug, Clone)]
pub struct Slot {
    pub id: SlotId,
    pub seats: SeatSet,
    pub color: Color,
}

/// A slot whose seat count differs from the required count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotViolation {
    pub slot: SlotId,
    pub seats: usize,
    pub required: usize,
}

impl fmt::Display for SlotViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Slot {} has {} seat(s), expected {}",
            self.slot, self.seats, self.required
        )
    }
}

/// One row of the host's slot selection widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionEntry {
    pub index: usize,
    pub id: SlotId,
    pub label: String,
    pub color: Color,
}

/// Slot CRUD plus the selection list that mirrors it.
///
/// `selection` is the ordered selection list (creation order) and
/// `positions` maps each id back to its index in it. Both are updated
/// together on every insert and delete.
#[derive(Debug, Clone)]
pub struct SlotManager {
    slots: BTreeMap<SlotId, Slot>,
    selection: Vec<SlotId>,
    positions: BTreeMap<SlotId, usize>,
    current: Option<SlotId>,
    high_water: SlotId,
    seats_per_slot: usize,
    palette: SlotPalette,
}

impl SlotManager {
    pub fn new(seats_per_slot: usize, palette: SlotPalette) -> Self {
        Self {
            slots: BTreeMap::new(),
            selection: Vec::new(),
            positions: BTreeMap::new(),
            current: None,
            high_water: 0,
            seats_per_slot,
            palette,
        }
    }

    /// Inserts a slot supplied by the host at load time.
    /// Does not change the current slot.
    pub(crate) fn insert_existing(&mut self, id: SlotId, seats: SeatSet) {
        if self.slots.contains_key(&id) {
            return;
        }
        let color = self.next_color();
        self.push(Slot { id, seats, color });
    }

    /// Allocates a fresh id (never one used earlier in the session),
    /// appends it to the selection list and makes it current.
    pub fn create_slot(&mut self) -> SlotId {
        let max_live = self.slots.keys().next_back().copied().unwrap_or(0);
        let id = self.high_water.max(max_live) + 1;
        let color = self.next_color();
        self.push(Slot {
            id,
            seats: SeatSet::new(),
            color,
        });
        self.current = Some(id);
        tracing::info!(slot = id, color = %color, "slot created");
        id
    }

    /// Removes the slot and closes the gap in the selection list.
    /// Unknown ids are ignored.
    pub fn delete_slot(&mut self, id: SlotId) -> bool {
        let Some(removed_at) = self.positions.remove(&id) else {
            return false;
        };
        self.slots.remove(&id);
        self.selection.remove(removed_at);
        for idx in self.positions.values_mut() {
            if *idx > removed_at {
                *idx -= 1;
            }
        }
        if self.current == Some(id) {
            self.current = None;
        }
        tracing::info!(slot = id, "slot deleted");
        true
    }

    pub fn select(&mut self, id: SlotId) -> bool {
        if self.slots.contains_key(&id) {
            self.current = Some(id);
            true
        } else {
            false
        }
    }

    pub fn current(&self) -> Option<SlotId> {
        self.current
    }

    pub(crate) fn current_slot_mut(&mut self) -> Option<&mut Slot> {
        let id = self.current?;
        self.slots.get_mut(&id)
    }

    pub fn get(&self, id: SlotId) -> Option<&Slot> {
        self.slots.get(&id)
    }

    pub fn seats_per_slot(&self) -> usize {
        self.seats_per_slot
    }

    /// Slots in selection-list order, which is also creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Slot> + '_ {
        self.selection.iter().filter_map(|id| self.slots.get(id))
    }

    /// Whether any slot, current or not, holds the cell.
    pub fn claims(&self, cell: Cell) -> bool {
        self.slots.values().any(|s| s.seats.contains(cell))
    }

    pub fn selection_index(&self, id: SlotId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    pub fn color_for(&self, id: SlotId) -> Option<Color> {
        self.slots.get(&id).map(|s| s.color)
    }

    pub fn label_for(&self, id: SlotId) -> Option<String> {
        let slot = self.slots.get(&id)?;
        let seats = slot
            .seats
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(",");
        Some(format!("Slot {} [{}]", id, seats))
    }

    pub fn selection_entries(&self) -> Vec<SelectionEntry> {
        self.selection
            .iter()
            .enumerate()
            .filter_map(|(index, &id)| {
                Some(SelectionEntry {
                    index,
                    id,
                    label: self.label_for(id)?,
                    color: self.color_for(id)?,
                })
            })
            .collect()
    }

    pub fn validate(&self) -> Vec<SlotViolation> {
        self.iter()
            .filter(|s| s.seats.len() != self.seats_per_slot)
            .map(|s| SlotViolation {
                slot: s.id,
                seats: s.seats.len(),
                required: self.seats_per_slot,
            })
            .collect()
    }

    /// `{id: [[x,y],...]}` for the host form.
    pub fn to_map(&self) -> BTreeMap<SlotId, &SeatSet> {
        self.slots.iter().map(|(&id, s)| (id, &s.seats)).collect()
    }

    fn next_color(&self) -> Color {
        let used: Vec<Color> = self.slots.values().map(|s| s.color).collect();
        self.palette.pick(&used)
    }

    fn push(&mut self, slot: Slot) {
        let id = slot.id;
        self.high_water = self.high_water.max(id);
        self.positions.insert(id, self.selection.len());
        self.selection.push(id);
        self.slots.insert(id, slot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> SlotManager {
        SlotManager::new(2, SlotPalette::new(Color::rgb(0, 0, 255)))
    }

    #[test]
    fn ids_are_never_reused() {
        let mut m = manager();
        let a = m.create_slot();
        let b = m.create_slot();
        assert_eq!((a, b), (1, 2));

        m.delete_slot(b);
        let c = m.create_slot();
        assert_eq!(c, 3);
        assert_eq!(m.current(), Some(3));
    }

    #[test]
    fn existing_ids_push_allocation_forward() {
        let mut m = manager();
        m.insert_existing(42, SeatSet::new());
        assert_eq!(m.current(), None);
        assert_eq!(m.create_slot(), 43);
    }

    #[test]
    fn delete_reindexes_selection() {
        let mut m = manager();
        let a = m.create_slot();
        let b = m.create_slot();
        let c = m.create_slot();
        let b_color = m.color_for(b);
        let b_label = m.label_for(b);

        assert!(m.delete_slot(a));
        assert_eq!(m.selection_index(b), Some(0));
        assert_eq!(m.selection_index(c), Some(1));
        assert_eq!(m.selection_index(a), None);
        assert_eq!(m.color_for(b), b_color);
        assert_eq!(m.label_for(b), b_label);

        let order: Vec<SlotId> = m.selection_entries().iter().map(|e| e.id).collect();
        assert_eq!(order, vec![b, c]);
    }

    #[test]
    fn delete_clears_current_only_when_removed() {
        let mut m = manager();
        let a = m.create_slot();
        let b = m.create_slot();
        assert_eq!(m.current(), Some(b));

        m.delete_slot(a);
        assert_eq!(m.current(), Some(b));
        m.delete_slot(b);
        assert_eq!(m.current(), None);
        assert!(!m.delete_slot(99));
    }

    #[test]
    fn deleted_color_is_reused() {
        let mut m = manager();
        let a = m.create_slot();
        let a_color = m.color_for(a);
        let b = m.create_slot();
        assert_ne!(m.color_for(b), a_color);

        m.delete_slot(a);
        let c = m.create_slot();
        assert_eq!(m.color_for(c), a_color);
    }

    #[test]
    fn label_and_validation() {
        let mut m = manager();
        let a = m.create_slot();
        if let Some(slot) = m.current_slot_mut() {
            slot.seats.insert(Cell::new(1, 2));
            slot.seats.insert(Cell::new(1, 1));
        }
        let b = m.create_slot();

        assert_eq!(m.label_for(a).as_deref(), Some("Slot 1 [[1,1],[1,2]]"));
        assert_eq!(m.label_for(b).as_deref(), Some("Slot 2 []"));

        assert_eq!(m.seats_per_slot(), 2);
        let v = m.validate();
        assert_eq!(
            v,
            vec![SlotViolation {
                slot: b,
                seats: 0,
                required: 2
            }]
        );
        assert_eq!(v[0].to_string(), "Slot 2 has 0 seat(s), expected 2");
    }
}
