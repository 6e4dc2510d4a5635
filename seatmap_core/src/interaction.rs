use crate::occupancy::{Edit, SeatLayers};
use crate::{Cell, GridDimensions, Resize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Paint,
    Erase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    /// No button held. Keeps the last cell the pointer was seen in.
    Idle(Option<Cell>),
    Hovering(Cell),
    Dragging(DragMode, Cell),
}

/// What the host has to do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Response {
    /// Full redraw needed.
    pub redraw: bool,
    /// Set when the event grew the canvas.
    pub resized: Option<Resize>,
    /// Set when the seat model changed.
    pub edited: bool,
}

impl Response {
    fn redraw() -> Self {
        Self {
            redraw: true,
            ..Self::default()
        }
    }

    fn absorb(&mut self, edit: Edit) {
        match edit {
            Edit::Unchanged => {}
            Edit::Changed => self.edited = true,
            Edit::Grown(r) => {
                self.edited = true;
                self.resized = Some(r);
            }
        }
    }
}

/// Turns pointer down/move/up into paint and erase calls.
///
/// The drag mode is decided once, from the cell under the press, and holds
/// for the whole gesture.
#[derive(Debug, Clone)]
pub struct InteractionController {
    state: InteractionState,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self {
            state: InteractionState::Idle(None),
        }
    }
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    fn last_cell(&self) -> Option<Cell> {
        match self.state {
            InteractionState::Idle(c) => c,
            InteractionState::Hovering(c) | InteractionState::Dragging(_, c) => Some(c),
        }
    }

    /// The cell to outline, if any. Only plain hovering shows one.
    pub fn hover_cell(&self) -> Option<Cell> {
        match self.state {
            InteractionState::Hovering(c) => Some(c),
            _ => None,
        }
    }

    pub fn pointer_down<L: SeatLayers + ?Sized>(
        &mut self,
        cell: Cell,
        layers: &mut L,
        grid: &mut GridDimensions,
    ) -> Response {
        let mut resp = Response::redraw();
        let mode = if layers.is_occupied(cell) {
            resp.absorb(layers.remove(cell));
            DragMode::Erase
        } else {
            resp.absorb(layers.add(cell, grid));
            DragMode::Paint
        };
        tracing::trace!(%cell, ?mode, "drag started");
        self.state = InteractionState::Dragging(mode, cell);
        resp
    }

    /// Moves within the last tracked cell are ignored.
    pub fn pointer_move<L: SeatLayers + ?Sized>(
        &mut self,
        cell: Cell,
        layers: &mut L,
        grid: &mut GridDimensions,
    ) -> Response {
        if self.last_cell() == Some(cell) {
            return Response::default();
        }

        let mut resp = Response::redraw();
        match self.state {
            InteractionState::Dragging(mode, _) => {
                let edit = match mode {
                    DragMode::Paint => layers.add(cell, grid),
                    DragMode::Erase => layers.remove(cell),
                };
                resp.absorb(edit);
                self.state = InteractionState::Dragging(mode, cell);
            }
            _ => self.state = InteractionState::Hovering(cell),
        }
        resp
    }

    /// The pointer left the canvas. Drops the hover outline; a drag in
    /// progress keeps its mode and last cell.
    pub fn pointer_leave(&mut self) -> Response {
        match self.state {
            InteractionState::Hovering(_) => {
                self.state = InteractionState::Idle(None);
                Response::redraw()
            }
            InteractionState::Idle(_) => {
                self.state = InteractionState::Idle(None);
                Response::default()
            }
            InteractionState::Dragging(..) => Response::default(),
        }
    }

    /// Ends the gesture. The picture is already current, so no redraw.
    pub fn pointer_up(&mut self) -> Response {
        self.state = InteractionState::Idle(self.last_cell());
        Response::default()
    }
}
