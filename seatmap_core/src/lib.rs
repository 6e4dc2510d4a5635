pub mod editor;
pub mod grid;
pub mod interaction;
pub mod occupancy;
pub mod palette;
pub mod params;
pub mod render;
pub mod seats;
pub mod slots;

mod error;

pub use editor::{Editor, Session};
pub use error::ParamsError;
pub use grid::{Cell, DEFAULT_HEIGHT_CELLS, DEFAULT_WIDTH_CELLS, GridDimensions, MARGIN_CELLS, Resize};
pub use interaction::{DragMode, InteractionController, InteractionState, Response};
pub use occupancy::{Edit, Layer, SeatLayers, SingleSet, SlottedSet};
pub use palette::{Color, SlotPalette};
pub use params::{CanvasParams, Mode};
pub use render::{DrawStyle, PxRect, Renderer, Surface};
pub use seats::SeatSet;
pub use slots::{SelectionEntry, Slot, SlotId, SlotManager, SlotViolation};
