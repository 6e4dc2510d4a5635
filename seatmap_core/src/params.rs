use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::slots::SlotId;
use crate::{Color, ParamsError, SeatSet};

/// The parameter object the host hands the editor at load time.
///
/// `eventSeats` + `seatsPerSlot` select the slotted editor, anything else
/// the single-set one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasParams {
    pub cell_size: u32,
    pub picked_color: Color,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_cells: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_cells: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_seats: Option<SeatSet>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_seats: Option<SeatSet>,
    #[serde(default, skip_serializing_if = "SeatSet::is_empty")]
    pub unavailable_seats: SeatSet,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub seat_slots: BTreeMap<SlotId, SeatSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seats_per_slot: Option<u32>,
}

/// Which editor the parameters ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Single,
    Slotted { seats_per_slot: u32 },
}

impl CanvasParams {
    pub fn single(cell_size: u32, picked_color: Color) -> Self {
        Self {
            cell_size,
            picked_color,
            width_cells: None,
            height_cells: None,
            old_seats: Some(SeatSet::new()),
            event_seats: None,
            unavailable_seats: SeatSet::new(),
            seat_slots: BTreeMap::new(),
            seats_per_slot: None,
        }
    }

    pub fn slotted(
        cell_size: u32,
        picked_color: Color,
        event_seats: SeatSet,
        seats_per_slot: u32,
    ) -> Self {
        Self {
            event_seats: Some(event_seats),
            seats_per_slot: Some(seats_per_slot),
            old_seats: None,
            ..Self::single(cell_size, picked_color)
        }
    }

    pub fn from_json(text: &str) -> Result<Self, ParamsError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path.as_ref()).context("read canvas params file")?;
        let params = Self::from_json(&text).context("parse canvas params")?;
        Ok(params)
    }

    pub fn save_json_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self).context("serialize canvas params")?;
        fs::write(path.as_ref(), json).context("write canvas params file")?;
        Ok(())
    }

    pub fn mode(&self) -> Result<Mode, ParamsError> {
        if self.cell_size == 0 {
            return Err(ParamsError::CellSize);
        }
        match (&self.event_seats, self.seats_per_slot) {
            (Some(_), Some(0)) => Err(ParamsError::SeatsPerSlot),
            (Some(_), Some(n)) => Ok(Mode::Slotted { seats_per_slot: n }),
            (Some(_), None) => Err(ParamsError::Missing("seatsPerSlot")),
            (None, Some(_)) => Err(ParamsError::Missing("eventSeats")),
            (None, None) => Ok(Mode::Single),
        }
    }
}
