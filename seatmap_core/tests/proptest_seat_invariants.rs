//! Property-based invariant tests for the seat editors.
//!
//! 1. A single-set editor never holds a border cell.
//! 2. Canvas growth is monotonic and keeps the margin past every seat.
//! 3. Slots stay pairwise disjoint, clear of reserved and border seats, and
//!    inside the event seats, whatever sequence of pointer and slot
//!    operations runs.
//! 4. `add` and `remove` are idempotent.
//! 5. A drag that starts on a seat never adds one.
//! 6. A seat added to a slot stays occupied until that slot removes it.

use proptest::prelude::*;
use seatmap_core::{
    CanvasParams, Cell, Color, Edit, Editor, GridDimensions, MARGIN_CELLS, SeatLayers, SeatSet,
    SingleSet, SlotManager, SlotPalette, SlottedSet,
};

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Down(Cell),
    Move(Cell),
    Up,
    CreateSlot,
    DeleteCurrent,
    Select(usize),
}

fn cell_strategy() -> impl Strategy<Value = Cell> {
    (0u32..12, 0u32..12).prop_map(|(x, y)| Cell::new(x, y))
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => cell_strategy().prop_map(Op::Down),
        6 => cell_strategy().prop_map(Op::Move),
        3 => Just(Op::Up),
        1 => Just(Op::CreateSlot),
        1 => Just(Op::DeleteCurrent),
        1 => (0usize..6).prop_map(Op::Select),
    ]
}

fn seat_set_strategy() -> impl Strategy<Value = SeatSet> {
    proptest::collection::vec(cell_strategy(), 0..40).prop_map(|v| v.into_iter().collect())
}

fn slotted_editor(event: SeatSet, reserved: SeatSet) -> Editor<SlottedSet> {
    let mut params = CanvasParams::slotted(10, Color::rgb(0, 0, 255), event, 3);
    params.unavailable_seats = reserved;
    Editor::slotted(&params).expect("valid params")
}

fn apply(ed: &mut Editor<SlottedSet>, op: &Op) {
    match op {
        Op::Down(c) => {
            ed.pointer_down(*c);
        }
        Op::Move(c) => {
            ed.pointer_move(*c);
        }
        Op::Up => {
            ed.pointer_up();
        }
        Op::CreateSlot => {
            ed.create_slot();
        }
        Op::DeleteCurrent => {
            ed.delete_current_slot();
        }
        Op::Select(i) => {
            if let Some(e) = ed.selection_entries().get(*i) {
                ed.select_slot(e.id);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1 + 2. Single-set border exclusion, monotonic growth, margin
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn single_set_border_and_growth(ops in proptest::collection::vec(op_strategy(), 1..80)) {
        let mut ed = Editor::single(&CanvasParams::single(10, Color::BLACK)).expect("valid params");
        let mut prev = *ed.grid();

        for op in &ops {
            match op {
                Op::Down(c) => { ed.pointer_down(*c); }
                Op::Move(c) => { ed.pointer_move(*c); }
                _ => { ed.pointer_up(); }
            }

            let g = *ed.grid();
            prop_assert!(g.width_cells >= prev.width_cells);
            prop_assert!(g.height_cells >= prev.height_cells);
            prev = g;

            for c in ed.layers().seats() {
                prop_assert!(!c.is_border(), "border cell {:?} painted", c);
                prop_assert!(g.width_cells >= c.x + MARGIN_CELLS);
                prop_assert!(g.height_cells >= c.y + MARGIN_CELLS);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Slot mutual exclusivity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn slots_stay_exclusive(
        event in seat_set_strategy(),
        reserved in seat_set_strategy(),
        ops in proptest::collection::vec(op_strategy(), 1..120),
    ) {
        let mut ed = slotted_editor(event.clone(), reserved.clone());

        for op in &ops {
            apply(&mut ed, op);

            let slots: Vec<_> = ed.layers().slots().iter().collect();
            for (i, a) in slots.iter().enumerate() {
                prop_assert!(a.seats.is_disjoint(&reserved));
                for c in &a.seats {
                    prop_assert!(event.contains(c));
                    prop_assert!(!c.is_border(), "slot {} holds border cell {:?}", a.id, c);
                }
                for b in &slots[i + 1..] {
                    prop_assert!(a.seats.is_disjoint(&b.seats), "slots {} and {} overlap", a.id, b.id);
                }
            }

            let positions: Vec<usize> = ed.selection_entries().iter().map(|e| e.index).collect();
            prop_assert_eq!(positions, (0..slots.len()).collect::<Vec<_>>());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Idempotence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn single_add_remove_idempotent(seed in seat_set_strategy(), c in cell_strategy()) {
        let mut grid = GridDimensions::new(10, 2, 2);
        let mut set = SingleSet::new(Color::BLACK);
        for s in &seed {
            set.add(s, &mut grid);
        }

        set.add(c, &mut grid);
        let once = (set.seats().clone(), grid);
        prop_assert_eq!(set.add(c, &mut grid), Edit::Unchanged);
        prop_assert_eq!(&(set.seats().clone(), grid), &once);

        set.remove(c);
        let once = set.seats().clone();
        prop_assert_eq!(set.remove(c), Edit::Unchanged);
        prop_assert_eq!(set.seats(), &once);
    }

    #[test]
    fn slotted_add_remove_idempotent(event in seat_set_strategy(), c in cell_strategy()) {
        let palette = SlotPalette::new(Color::BLACK);
        let mut set = SlottedSet::new(Color::BLACK, event, SeatSet::new(), SlotManager::new(2, palette));
        let mut grid = GridDimensions::new(10, 14, 14);
        set.create_slot();

        set.add(c, &mut grid);
        let once = set.submission_json().expect("serializable");
        prop_assert_eq!(set.add(c, &mut grid), Edit::Unchanged);
        prop_assert_eq!(set.submission_json().expect("serializable"), once);

        set.remove(c);
        let once = set.submission_json().expect("serializable");
        prop_assert_eq!(set.remove(c), Edit::Unchanged);
        prop_assert_eq!(set.submission_json().expect("serializable"), once);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Erase drags never add
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn erase_drag_never_adds(
        seed in seat_set_strategy(),
        path in proptest::collection::vec(cell_strategy(), 0..30),
    ) {
        let mut params = CanvasParams::single(10, Color::BLACK);
        params.old_seats = Some(seed);
        let mut ed = Editor::single(&params).expect("valid params");

        let Some(start) = ed.layers().seats().iter().next() else {
            return Ok(());
        };
        let before = ed.layers().seats().clone();

        ed.pointer_down(start);
        for c in &path {
            ed.pointer_move(*c);
        }
        ed.pointer_up();

        let after = ed.layers().seats();
        prop_assert!(!after.contains(start));
        for c in after {
            prop_assert!(before.contains(c), "erase drag added {:?}", c);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Claimed seats stay occupied
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn added_slot_seat_stays_occupied(
        event in seat_set_strategy(),
        c in cell_strategy(),
        others in proptest::collection::vec(cell_strategy(), 0..20),
    ) {
        let palette = SlotPalette::new(Color::BLACK);
        let mut set = SlottedSet::new(Color::BLACK, event, SeatSet::new(), SlotManager::new(2, palette));
        let mut grid = GridDimensions::new(10, 14, 14);
        let owner = set.create_slot();

        if set.add(c, &mut grid) != Edit::Changed {
            return Ok(());
        }

        let other = set.create_slot();
        for o in &others {
            set.add(*o, &mut grid);
            set.remove(*o);
            prop_assert!(set.is_occupied(c));
        }

        set.select_slot(other);
        set.remove(c);
        prop_assert!(set.is_occupied(c));

        set.select_slot(owner);
        prop_assert_eq!(set.remove(c), Edit::Changed);
    }
}
