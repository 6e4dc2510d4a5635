use crate::slots::{SlotId, SlotManager, SlotViolation};
use crate::{Cell, Color, GridDimensions, Resize, SeatSet};

/// Result of an `add` or `remove`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    Unchanged,
    Changed,
    /// The seat was added and the canvas had to grow for it.
    Grown(Resize),
}

impl Edit {
    pub fn changed(&self) -> bool {
        !matches!(self, Edit::Unchanged)
    }
}

/// One seat set as the renderer fills it.
#[derive(Debug, Clone, Copy)]
pub struct Layer<'a> {
    pub color: Color,
    pub seats: &'a SeatSet,
}

/// What an editor needs from its seat model.
pub trait SeatLayers {
    /// True when the cell cannot take a new seat in the active context.
    fn is_occupied(&self, cell: Cell) -> bool;

    fn add(&mut self, cell: Cell, grid: &mut GridDimensions) -> Edit;

    fn remove(&mut self, cell: Cell) -> Edit;

    /// Layers in draw order; later layers paint over earlier ones.
    fn layers(&self) -> Vec<Layer<'_>>;

    fn violations(&self) -> Vec<SlotViolation> {
        Vec::new()
    }

    /// The JSON string written into the host form on submission.
    fn submission_json(&self) -> serde_json::Result<String>;
}

/// A single paintable seat set.
#[derive(Debug, Clone)]
pub struct SingleSet {
    pub color: Color,
    seats: SeatSet,
}

impl SingleSet {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            seats: SeatSet::new(),
        }
    }

    pub fn seats(&self) -> &SeatSet {
        &self.seats
    }
}

impl SeatLayers for SingleSet {
    fn is_occupied(&self, cell: Cell) -> bool {
        self.seats.contains(cell)
    }

    fn add(&mut self, cell: Cell, grid: &mut GridDimensions) -> Edit {
        if cell.is_border() || !self.seats.insert(cell) {
            return Edit::Unchanged;
        }
        tracing::debug!(%cell, "seat added");
        match grid.ensure_margin(cell) {
            Some(r) => Edit::Grown(r),
            None => Edit::Changed,
        }
    }

    fn remove(&mut self, cell: Cell) -> Edit {
        if self.seats.remove(cell) {
            tracing::debug!(%cell, "seat removed");
            Edit::Changed
        } else {
            Edit::Unchanged
        }
    }

    fn layers(&self) -> Vec<Layer<'_>> {
        vec![Layer {
            color: self.color,
            seats: &self.seats,
        }]
    }

    fn submission_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.seats)
    }
}

/// Event seats partitioned into mutually exclusive slots.
///
/// A cell can join the current slot only if it is a non-border event seat
/// that is neither reserved nor held by any slot. Slot seats only change
/// through `add`, `remove` and `load_slot`.
#[derive(Debug, Clone)]
pub struct SlottedSet {
    pub event_color: Color,
    event_seats: SeatSet,
    reserved: SeatSet,
    slots: SlotManager,
}

impl SlottedSet {
    pub fn new(
        event_color: Color,
        event_seats: SeatSet,
        reserved: SeatSet,
        slots: SlotManager,
    ) -> Self {
        Self {
            event_color,
            event_seats,
            reserved,
            slots,
        }
    }

    /// Loads a host-supplied slot, dropping seats that break exclusivity.
    pub fn load_slot(&mut self, id: SlotId, seats: &SeatSet) {
        let mut kept = SeatSet::new();
        for cell in seats {
            if self.is_occupied(cell) || kept.contains(cell) {
                tracing::warn!(slot = id, %cell, "dropping unavailable seat from initial slot");
                continue;
            }
            kept.insert(cell);
        }
        self.slots.insert_existing(id, kept);
    }

    pub fn slots(&self) -> &SlotManager {
        &self.slots
    }

    pub fn create_slot(&mut self) -> SlotId {
        self.slots.create_slot()
    }

    pub fn delete_slot(&mut self, id: SlotId) -> bool {
        self.slots.delete_slot(id)
    }

    pub fn select_slot(&mut self, id: SlotId) -> bool {
        self.slots.select(id)
    }
}

impl SeatLayers for SlottedSet {
    fn is_occupied(&self, cell: Cell) -> bool {
        cell.is_border()
            || !self.event_seats.contains(cell)
            || self.reserved.contains(cell)
            || self.slots.claims(cell)
    }

    /// Never grows the canvas: the event seats fixed its extent at load.
    fn add(&mut self, cell: Cell, _grid: &mut GridDimensions) -> Edit {
        if self.slots.current().is_none() || self.is_occupied(cell) {
            return Edit::Unchanged;
        }
        let Some(slot) = self.slots.current_slot_mut() else {
            return Edit::Unchanged;
        };
        if !slot.seats.insert(cell) {
            return Edit::Unchanged;
        }
        tracing::debug!(slot = slot.id, %cell, "seat added to slot");
        Edit::Changed
    }

    fn remove(&mut self, cell: Cell) -> Edit {
        let Some(slot) = self.slots.current_slot_mut() else {
            return Edit::Unchanged;
        };
        if !slot.seats.remove(cell) {
            return Edit::Unchanged;
        }
        tracing::debug!(slot = slot.id, %cell, "seat removed from slot");
        Edit::Changed
    }

    fn layers(&self) -> Vec<Layer<'_>> {
        let mut out = vec![
            Layer {
                color: self.event_color,
                seats: &self.event_seats,
            },
            Layer {
                color: Color::BLOCKED,
                seats: &self.reserved,
            },
        ];
        out.extend(self.slots.iter().map(|s| Layer {
            color: s.color,
            seats: &s.seats,
        }));
        out
    }

    fn violations(&self) -> Vec<SlotViolation> {
        self.slots.validate()
    }

    fn submission_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.slots.to_map())
    }
}
