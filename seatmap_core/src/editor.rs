use crate::interaction::{InteractionController, InteractionState, Response};
use crate::occupancy::{SeatLayers, SingleSet, SlottedSet};
use crate::params::{CanvasParams, Mode};
use crate::render::{Renderer, Surface};
use crate::slots::{SelectionEntry, SlotId, SlotManager, SlotViolation};
use crate::{
    Cell, DEFAULT_HEIGHT_CELLS, DEFAULT_WIDTH_CELLS, GridDimensions, ParamsError, Resize,
    SlotPalette,
};

/// One editing session: grid, seat model, pointer state and renderer.
/// Nothing here is shared with other editors.
#[derive(Debug)]
pub struct Editor<L> {
    grid: GridDimensions,
    layers: L,
    controller: InteractionController,
    renderer: Renderer,
    violations: Vec<SlotViolation>,
    pending_resize: Option<Resize>,
    dirty: bool,
}

impl<L: SeatLayers> Editor<L> {
    pub fn new(grid: GridDimensions, layers: L) -> Self {
        let violations = layers.violations();
        Self {
            pending_resize: Some(Resize {
                width_px: grid.width_px(),
                height_px: grid.height_px(),
            }),
            grid,
            layers,
            controller: InteractionController::new(),
            renderer: Renderer::new(),
            violations,
            dirty: true,
        }
    }

    pub fn grid(&self) -> &GridDimensions {
        &self.grid
    }

    pub fn layers(&self) -> &L {
        &self.layers
    }

    pub fn state(&self) -> InteractionState {
        self.controller.state()
    }

    pub fn hover_cell(&self) -> Option<Cell> {
        self.controller.hover_cell()
    }

    /// Advisory only, never blocks an edit.
    pub fn violations(&self) -> &[SlotViolation] {
        &self.violations
    }

    pub fn needs_redraw(&self) -> bool {
        self.dirty
    }

    pub fn pointer_down(&mut self, cell: Cell) -> Response {
        let resp = self
            .controller
            .pointer_down(cell, &mut self.layers, &mut self.grid);
        self.absorb(resp)
    }

    pub fn pointer_move(&mut self, cell: Cell) -> Response {
        let resp = self
            .controller
            .pointer_move(cell, &mut self.layers, &mut self.grid);
        self.absorb(resp)
    }

    pub fn pointer_up(&mut self) -> Response {
        let resp = self.controller.pointer_up();
        self.absorb(resp)
    }

    pub fn pointer_leave(&mut self) -> Response {
        let resp = self.controller.pointer_leave();
        self.absorb(resp)
    }

    pub fn pointer_down_px(&mut self, px: f32, py: f32) -> Response {
        let cell = self.grid.pixel_to_cell(px, py);
        self.pointer_down(cell)
    }

    pub fn pointer_move_px(&mut self, px: f32, py: f32) -> Response {
        let cell = self.grid.pixel_to_cell(px, py);
        self.pointer_move(cell)
    }

    /// Applies any pending resize (which resets draw style) and redraws.
    pub fn paint<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        if let Some(r) = self.pending_resize.take() {
            self.renderer.resize(surface, r);
        }
        let layers = self.layers.layers();
        self.renderer
            .redraw(surface, &self.grid, &layers, self.controller.hover_cell());
        self.dirty = false;
    }

    pub fn submission_json(&self) -> serde_json::Result<String> {
        self.layers.submission_json()
    }

    fn absorb(&mut self, resp: Response) -> Response {
        if let Some(r) = resp.resized {
            self.pending_resize = Some(r);
        }
        if resp.edited {
            self.violations = self.layers.violations();
        }
        self.dirty |= resp.redraw;
        resp
    }

    fn slots_changed(&mut self) {
        self.violations = self.layers.violations();
        self.dirty = true;
    }
}

impl Editor<SingleSet> {
    /// Replays `add` on every old seat, so border cells are dropped and the
    /// canvas grows to fit.
    pub fn single(params: &CanvasParams) -> Result<Self, ParamsError> {
        let mut grid = initial_grid(params)?;
        let mut set = SingleSet::new(params.picked_color);
        if let Some(old) = &params.old_seats {
            for cell in old {
                set.add(cell, &mut grid);
            }
        }
        Ok(Self::new(grid, set))
    }
}

impl Editor<SlottedSet> {
    /// The event, reserved and slot seats fix the canvas extent here, once.
    pub fn slotted(params: &CanvasParams) -> Result<Self, ParamsError> {
        let Mode::Slotted { seats_per_slot } = params.mode()? else {
            return Err(ParamsError::Missing("eventSeats"));
        };
        let mut grid = initial_grid(params)?;
        let event_seats = params.event_seats.clone().unwrap_or_default();

        let everything = event_seats
            .iter()
            .chain(params.unavailable_seats.iter())
            .chain(params.seat_slots.values().flat_map(|s| s.iter()));
        for cell in everything {
            grid.ensure_margin(cell);
        }

        let manager = SlotManager::new(
            seats_per_slot as usize,
            SlotPalette::new(params.picked_color),
        );
        let mut set = SlottedSet::new(
            params.picked_color,
            event_seats,
            params.unavailable_seats.clone(),
            manager,
        );
        for (&id, seats) in &params.seat_slots {
            set.load_slot(id, seats);
        }
        Ok(Self::new(grid, set))
    }

    pub fn current_slot(&self) -> Option<SlotId> {
        self.layers.slots().current()
    }

    pub fn create_slot(&mut self) -> SlotId {
        let id = self.layers.create_slot();
        self.slots_changed();
        id
    }

    /// The "remove slot" button: deletes the current slot, if any.
    pub fn delete_current_slot(&mut self) -> Option<SlotId> {
        let id = self.layers.slots().current()?;
        self.delete_slot(id).then_some(id)
    }

    pub fn delete_slot(&mut self, id: SlotId) -> bool {
        let removed = self.layers.delete_slot(id);
        if removed {
            self.slots_changed();
        }
        removed
    }

    pub fn select_slot(&mut self, id: SlotId) -> bool {
        self.layers.select_slot(id)
    }

    /// Rows for the selection widget, labels reflecting the latest edits.
    pub fn selection_entries(&self) -> Vec<SelectionEntry> {
        self.layers.slots().selection_entries()
    }
}

fn initial_grid(params: &CanvasParams) -> Result<GridDimensions, ParamsError> {
    if params.cell_size == 0 {
        return Err(ParamsError::CellSize);
    }
    Ok(GridDimensions::new(
        params.cell_size,
        params.width_cells.unwrap_or(DEFAULT_WIDTH_CELLS),
        params.height_cells.unwrap_or(DEFAULT_HEIGHT_CELLS),
    ))
}

/// An editor of either kind, chosen once from the construction parameters.
#[derive(Debug)]
pub enum Session {
    Single(Editor<SingleSet>),
    Slotted(Editor<SlottedSet>),
}

impl Session {
    pub fn from_params(params: &CanvasParams) -> Result<Self, ParamsError> {
        let session = match params.mode()? {
            Mode::Single => Session::Single(Editor::single(params)?),
            Mode::Slotted { .. } => Session::Slotted(Editor::slotted(params)?),
        };
        tracing::info!(
            kind = session.kind(),
            cell_size = params.cell_size,
            "editor session started"
        );
        Ok(session)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Session::Single(_) => "single",
            Session::Slotted(_) => "slotted",
        }
    }

    pub fn grid(&self) -> &GridDimensions {
        match self {
            Session::Single(e) => e.grid(),
            Session::Slotted(e) => e.grid(),
        }
    }

    pub fn is_occupied(&self, cell: Cell) -> bool {
        match self {
            Session::Single(e) => e.layers().is_occupied(cell),
            Session::Slotted(e) => e.layers().is_occupied(cell),
        }
    }

    pub fn pointer_down(&mut self, cell: Cell) -> Response {
        match self {
            Session::Single(e) => e.pointer_down(cell),
            Session::Slotted(e) => e.pointer_down(cell),
        }
    }

    pub fn pointer_move(&mut self, cell: Cell) -> Response {
        match self {
            Session::Single(e) => e.pointer_move(cell),
            Session::Slotted(e) => e.pointer_move(cell),
        }
    }

    pub fn pointer_up(&mut self) -> Response {
        match self {
            Session::Single(e) => e.pointer_up(),
            Session::Slotted(e) => e.pointer_up(),
        }
    }

    pub fn pointer_leave(&mut self) -> Response {
        match self {
            Session::Single(e) => e.pointer_leave(),
            Session::Slotted(e) => e.pointer_leave(),
        }
    }

    pub fn pointer_down_px(&mut self, px: f32, py: f32) -> Response {
        let cell = self.grid().pixel_to_cell(px, py);
        self.pointer_down(cell)
    }

    pub fn pointer_move_px(&mut self, px: f32, py: f32) -> Response {
        let cell = self.grid().pixel_to_cell(px, py);
        self.pointer_move(cell)
    }

    pub fn paint<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        match self {
            Session::Single(e) => e.paint(surface),
            Session::Slotted(e) => e.paint(surface),
        }
    }

    pub fn needs_redraw(&self) -> bool {
        match self {
            Session::Single(e) => e.needs_redraw(),
            Session::Slotted(e) => e.needs_redraw(),
        }
    }

    pub fn violations(&self) -> &[SlotViolation] {
        match self {
            Session::Single(e) => e.violations(),
            Session::Slotted(e) => e.violations(),
        }
    }

    pub fn submission_json(&self) -> serde_json::Result<String> {
        match self {
            Session::Single(e) => e.submission_json(),
            Session::Slotted(e) => e.submission_json(),
        }
    }

    pub fn slotted_mut(&mut self) -> Option<&mut Editor<SlottedSet>> {
        match self {
            Session::Slotted(e) => Some(e),
            Session::Single(_) => None,
        }
    }

    pub fn slotted(&self) -> Option<&Editor<SlottedSet>> {
        match self {
            Session::Slotted(e) => Some(e),
            Session::Single(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests::{Op, Recorder};
    use crate::{Color, SeatSet};

    fn event_seats(pairs: &[[u32; 2]]) -> SeatSet {
        pairs.iter().copied().map(Cell::from).collect()
    }

    #[test]
    fn single_scenario_paint_then_erase_drag() -> anyhow::Result<()> {
        let params = CanvasParams::single(25, "blue".parse()?);
        let mut ed = Editor::single(&params)?;

        ed.pointer_down(Cell::new(3, 4));
        ed.pointer_up();
        assert!(ed.grid().width_px() >= (3 + 2) * 25);
        assert_eq!(ed.submission_json()?, "[[3,4]]");

        ed.pointer_down(Cell::new(3, 4));
        ed.pointer_move(Cell::new(3, 5));
        ed.pointer_move(Cell::new(3, 6));
        ed.pointer_up();
        assert_eq!(ed.submission_json()?, "[]");
        Ok(())
    }

    #[test]
    fn old_seats_drop_border_and_size_canvas() -> anyhow::Result<()> {
        let mut params = CanvasParams::single(10, Color::BLACK);
        params.old_seats = Some(event_seats(&[[0, 5], [20, 1], [2, 3]]));
        let ed = Editor::single(&params)?;

        assert_eq!(ed.layers().seats().len(), 2);
        assert!(ed.grid().width_cells >= 22);
        Ok(())
    }

    #[test]
    fn slotted_scenario() -> anyhow::Result<()> {
        let params = CanvasParams::slotted(25, Color::BLACK, event_seats(&[[1, 1], [1, 2]]), 1);
        let mut ed = Editor::slotted(&params)?;

        let a = ed.create_slot();
        ed.pointer_down(Cell::new(1, 1));
        ed.pointer_up();
        assert!(ed.layers().slots().get(a).unwrap().seats.contains(Cell::new(1, 1)));

        let b = ed.create_slot();
        ed.pointer_down(Cell::new(1, 1));
        ed.pointer_up();
        assert!(ed.layers().slots().get(b).unwrap().seats.is_empty());
        assert!(ed.layers().slots().get(a).unwrap().seats.contains(Cell::new(1, 1)));

        let v = ed.violations();
        assert_eq!(v.len(), 1);
        assert_eq!((v[0].slot, v[0].seats, v[0].required), (b, 0, 1));
        Ok(())
    }

    #[test]
    fn deleting_first_slot_shifts_second() -> anyhow::Result<()> {
        let params = CanvasParams::slotted(25, Color::BLACK, event_seats(&[[1, 1]]), 1);
        let mut ed = Editor::slotted(&params)?;
        let a = ed.create_slot();
        let b = ed.create_slot();
        let before = ed.selection_entries()[1].clone();
        assert_eq!(before.index, 1);

        ed.select_slot(a);
        assert_eq!(ed.delete_current_slot(), Some(a));
        assert_eq!(ed.current_slot(), None);

        let after = ed.selection_entries();
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].id, b);
        assert_eq!(after[0].index, 0);
        assert_eq!(after[0].color, before.color);
        assert_eq!(after[0].label, before.label);
        assert_eq!(ed.delete_current_slot(), None);
        Ok(())
    }

    #[test]
    fn slotted_extent_is_fixed_by_event_seats() -> anyhow::Result<()> {
        let params = CanvasParams::slotted(25, Color::BLACK, event_seats(&[[30, 2]]), 1);
        let mut ed = Editor::slotted(&params)?;
        assert_eq!(ed.grid().width_cells, 32);

        ed.create_slot();
        ed.pointer_down(Cell::new(40, 2));
        ed.pointer_up();
        assert_eq!(ed.grid().width_cells, 32);
        Ok(())
    }

    #[test]
    fn growth_forces_style_before_next_draw() -> anyhow::Result<()> {
        let params = CanvasParams::single(25, Color::BLACK);
        let mut ed = Editor::single(&params)?;
        let mut surface = Recorder::default();
        ed.paint(&mut surface);
        assert!(!ed.needs_redraw());

        surface.ops.clear();
        let r = ed.pointer_down(Cell::new(30, 1));
        assert!(r.resized.is_some());
        assert!(ed.needs_redraw());
        ed.paint(&mut surface);

        assert_eq!(surface.ops[0], Op::Resize(32 * 25, 6 * 25));
        assert!(matches!(surface.ops[1], Op::Style(_)));
        assert!(matches!(surface.ops[2], Op::Clear(..)));
        Ok(())
    }

    #[test]
    fn hover_outline_follows_pointer() -> anyhow::Result<()> {
        let params = CanvasParams::single(25, Color::BLACK);
        let mut ed = Editor::single(&params)?;
        let mut surface = Recorder::default();

        ed.pointer_move_px(60.0, 60.0);
        ed.paint(&mut surface);
        let strokes = surface.strokes();
        assert_eq!(strokes.len(), 1);
        assert_eq!((strokes[0].0.x, strokes[0].0.y), (50.0, 50.0));

        // no outline while dragging
        surface.ops.clear();
        ed.pointer_down_px(60.0, 60.0);
        ed.paint(&mut surface);
        assert!(surface.strokes().is_empty());
        Ok(())
    }

    #[test]
    fn leaving_canvas_clears_hover() -> anyhow::Result<()> {
        let mut session = Session::from_params(&CanvasParams::single(25, Color::BLACK))?;
        let mut surface = Recorder::default();

        session.pointer_move(Cell::new(2, 2));
        session.paint(&mut surface);
        assert_eq!(surface.strokes().len(), 1);

        assert!(session.pointer_leave().redraw);
        assert!(session.needs_redraw());
        surface.ops.clear();
        session.paint(&mut surface);
        assert!(surface.strokes().is_empty());

        // coming back to the same cell outlines it again
        assert!(session.pointer_move(Cell::new(2, 2)).redraw);
        surface.ops.clear();
        session.paint(&mut surface);
        assert_eq!(surface.strokes().len(), 1);
        Ok(())
    }

    #[test]
    fn session_picks_variant() -> anyhow::Result<()> {
        let single = Session::from_params(&CanvasParams::single(25, Color::BLACK))?;
        assert_eq!(single.kind(), "single");
        assert!(single.slotted().is_none());

        let slotted = Session::from_params(&CanvasParams::slotted(
            25,
            Color::BLACK,
            SeatSet::new(),
            2,
        ))?;
        assert_eq!(slotted.kind(), "slotted");
        assert_eq!(slotted.submission_json()?, "{}");
        Ok(())
    }
}
