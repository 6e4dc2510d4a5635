use anyhow::Context;
use seatmap_core::{
    CanvasParams, Cell, Color, DrawStyle, PxRect, SeatSet, Session, SlotId, Surface,
};
use std::env;
use std::fs;
use std::io::{self, Write};

fn print_help() {
    println!(
        r#"SeatMap CLI

            Commands:
            new-event <params.json> [cell_size] [color]
            new-slots <params.json> <seats_per_slot> <width> <height>
            show <params.json>
            repl <params.json> [submission.json]

            Examples:
            cargo run -p seatmap_cli -- new-event event.json 25 blue
            cargo run -p seatmap_cli -- new-slots tournament.json 5 10 6
            cargo run -p seatmap_cli -- show tournament.json
            cargo run -p seatmap_cli -- repl event.json seats.json
        "#
    );
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Renders the grid as characters, one per cell.
/// Fill colors map to symbols through `legend`; unknown colors print `?`.
struct TextSurface {
    cell_size: f32,
    cols: usize,
    rows: usize,
    cells: Vec<char>,
    legend: Vec<(Color, char)>,
}

impl TextSurface {
    fn new(cell_size: u32, legend: Vec<(Color, char)>) -> Self {
        Self {
            cell_size: cell_size.max(1) as f32,
            cols: 0,
            rows: 0,
            cells: Vec::new(),
            legend,
        }
    }

    fn cell_at(&self, x: f32, y: f32) -> Option<usize> {
        let cx = (x / self.cell_size).floor() as usize;
        let cy = (y / self.cell_size).floor() as usize;
        (cx < self.cols && cy < self.rows).then_some(cy * self.cols + cx)
    }

    fn render(&self) -> String {
        let mut out = String::from("   ");
        for x in 1..self.cols {
            out.push(char::from_digit((x % 10) as u32, 10).unwrap_or(' '));
        }
        out.push('\n');
        for y in 1..self.rows {
            out.push_str(&format!("{y:>2} "));
            for x in 1..self.cols {
                out.push(self.cells[y * self.cols + x]);
            }
            out.push('\n');
        }
        out
    }
}

impl Surface for TextSurface {
    fn resize(&mut self, width_px: u32, height_px: u32) {
        self.cols = (width_px as f32 / self.cell_size) as usize;
        self.rows = (height_px as f32 / self.cell_size) as usize;
        self.cells = vec![' '; self.cols * self.rows];
    }

    fn apply_style(&mut self, _style: &DrawStyle) {}

    fn clear(&mut self, _width_px: u32, _height_px: u32) {
        self.cells.iter_mut().for_each(|c| *c = ' ');
    }

    fn line(&mut self, _from: (f32, f32), _to: (f32, f32), _color: Color) {}

    fn fill_rect(&mut self, rect: PxRect, color: Color) {
        let sym = self
            .legend
            .iter()
            .find(|(c, _)| *c == color)
            .map(|&(_, s)| s)
            .unwrap_or('?');
        if let Some(i) = self.cell_at(rect.x, rect.y) {
            self.cells[i] = sym;
        }
    }

    fn stroke_rect(&mut self, rect: PxRect, _color: Color) {
        if let Some(i) = self.cell_at(rect.x + 1.0, rect.y + 1.0) {
            self.cells[i] = '+';
        }
    }

    fn text(&mut self, _text: &str, _baseline: (f32, f32), _max_width: f32, _color: Color) {}
}

fn legend(session: &Session, base: Color) -> Vec<(Color, char)> {
    let mut out = Vec::new();
    match session {
        Session::Single(_) => out.push((base, '#')),
        Session::Slotted(ed) => {
            // slots first so they win over a base color that happens to match
            for (i, e) in ed.selection_entries().iter().enumerate() {
                let sym = (b'A' + (i % 26) as u8) as char;
                out.push((e.color, sym));
            }
            out.push((base, 'o'));
            out.push((Color::BLOCKED, 'x'));
        }
    }
    out
}

fn print_map(session: &mut Session, base: Color) {
    let mut surface = TextSurface::new(session.grid().cell_size, legend(session, base));
    let g = *session.grid();
    // a fresh surface has no size yet
    surface.resize(g.width_px(), g.height_px());
    session.paint(&mut surface);
    print!("{}", surface.render());
}

fn print_slots(session: &Session) {
    let Some(ed) = session.slotted() else {
        println!("(single seat set, no slots)");
        return;
    };
    println!("Seats per slot: {}", ed.layers().slots().seats_per_slot());
    let entries = ed.selection_entries();
    if entries.is_empty() {
        println!("(no slots)");
        return;
    }
    for (i, e) in entries.iter().enumerate() {
        let sym = (b'A' + (i % 26) as u8) as char;
        let mark = if ed.current_slot() == Some(e.id) { " <==" } else { "" };
        println!("  {} {} | {} | {}{}", sym, e.index, e.color, e.label, mark);
    }
}

fn print_violations(session: &Session) {
    let v = session.violations();
    if v.is_empty() {
        println!("(no errors)");
        return;
    }
    for violation in v {
        println!("  {violation}");
    }
}

/// Cells on a straight path from `a` to `b`, both ends included.
fn line_cells(a: Cell, b: Cell) -> Vec<Cell> {
    let (x0, y0) = (a.x as i64, a.y as i64);
    let (dx, dy) = (b.x as i64 - x0, b.y as i64 - y0);
    let steps = dx.abs().max(dy.abs());
    if steps == 0 {
        return vec![a];
    }
    (0..=steps)
        .map(|i| {
            let x = x0 + (dx * i + steps / 2 * dx.signum()) / steps;
            let y = y0 + (dy * i + steps / 2 * dy.signum()) / steps;
            Cell::new(x.max(0) as u32, y.max(0) as u32)
        })
        .collect()
}

fn parse_cell(parts: &[&str]) -> anyhow::Result<Cell> {
    let x: u32 = parts[0].parse().context("x must be a number")?;
    let y: u32 = parts[1].parse().context("y must be a number")?;
    Ok(Cell::new(x, y))
}

fn repl(params_path: &str, out_path: &str) -> anyhow::Result<()> {
    let params = CanvasParams::load_json_file(params_path)
        .with_context(|| format!("failed to load params '{params_path}'"))?;
    let mut session = Session::from_params(&params)?;
    let base = params.picked_color;

    println!("Loaded {} editor from {}", session.kind(), params_path);
    println!("Type 'help' for commands. 'quit' to exit.");

    loop {
        print!("seat> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let cmd = parts[0].to_lowercase();

        match cmd.as_str() {
            "help" => {
                println!(
                    r#"Commands:
                        down <x> <y>
                        move <x> <y>
                        up
                        click <x> <y>            (down + up)
                        drag <x1> <y1> <x2> <y2> (down, move along a line, up)
                        slot new
                        slot delete              (deletes the current slot)
                        slot select <id>
                        slots
                        map
                        errors
                        submit                   (print submission json)
                        save                     (write submission json)
                        quit
                        "#
                );
            }
            "quit" | "exit" => break,

            "down" | "move" | "click" => {
                if parts.len() != 3 {
                    println!("Usage: {cmd} <x> <y>");
                    continue;
                }
                let cell = parse_cell(&parts[1..])?;
                match cmd.as_str() {
                    "down" => {
                        session.pointer_down(cell);
                    }
                    "move" => {
                        session.pointer_move(cell);
                    }
                    _ => {
                        session.pointer_down(cell);
                        session.pointer_up();
                    }
                }
                print_map(&mut session, base);
            }

            "up" => {
                session.pointer_up();
            }

            "drag" => {
                if parts.len() != 5 {
                    println!("Usage: drag <x1> <y1> <x2> <y2>");
                    continue;
                }
                let from = parse_cell(&parts[1..3])?;
                let to = parse_cell(&parts[3..5])?;
                let path = line_cells(from, to);
                session.pointer_down(from);
                for &c in path.iter().skip(1) {
                    session.pointer_move(c);
                }
                session.pointer_up();
                print_map(&mut session, base);
            }

            "slot" => {
                let Some(ed) = session.slotted_mut() else {
                    println!("This editor has no slots.");
                    continue;
                };
                match parts.get(1).map(|s| s.to_lowercase()).as_deref() {
                    Some("new") => {
                        let id = ed.create_slot();
                        println!("Created slot {id} (now current)");
                    }
                    Some("delete") => match ed.delete_current_slot() {
                        Some(id) => println!("Deleted slot {id}"),
                        None => println!("No slot selected."),
                    },
                    Some("select") if parts.len() == 3 => {
                        let id: SlotId = parts[2].parse().context("slot id must be a number")?;
                        if ed.select_slot(id) {
                            println!("Current slot = {id}");
                        } else {
                            println!("Unknown slot {id}");
                        }
                    }
                    _ => println!("Usage: slot new | slot delete | slot select <id>"),
                }
            }

            "slots" => print_slots(&session),
            "map" => print_map(&mut session, base),
            "errors" => print_violations(&session),

            "submit" => println!("{}", session.submission_json()?),

            "save" => {
                let json = session.submission_json()?;
                fs::write(out_path, json)
                    .with_context(|| format!("write submission '{out_path}'"))?;
                tracing::info!(path = out_path, "submission written");
                println!("Saved submission: {out_path}");
            }

            _ => println!("Unknown command. Type 'help'."),
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_help();
        return Ok(());
    }

    match args[1].as_str() {
        "new-event" => {
            let path = args.get(2).context("missing <params.json>")?;
            let cell_size: u32 = match args.get(3) {
                Some(s) => s.parse().context("cell_size must be a number")?,
                None => 25,
            };
            let color: Color = args.get(4).map(String::as_str).unwrap_or("blue").parse()?;

            CanvasParams::single(cell_size, color).save_json_file(path)?;
            println!("Saved event params to: {path}");
        }
        "new-slots" => {
            let path = args.get(2).context("missing <params.json>")?;
            let per_slot: u32 = args
                .get(3)
                .context("missing <seats_per_slot>")?
                .parse()
                .context("seats_per_slot must be a number")?;
            let width: u32 = args
                .get(4)
                .context("missing <width>")?
                .parse()
                .context("width must be a number")?;
            let height: u32 = args
                .get(5)
                .context("missing <height>")?
                .parse()
                .context("height must be a number")?;

            let seats: SeatSet = (1..=width)
                .flat_map(|x| (1..=height).map(move |y| Cell::new(x, y)))
                .collect();
            let params = CanvasParams::slotted(25, Color::rgb(0, 0, 255), seats, per_slot);
            params.mode()?;
            params.save_json_file(path)?;
            println!("Saved slot params ({width}x{height} event seats) to: {path}");
        }
        "show" => {
            let path = args.get(2).context("missing <params.json>")?;
            let params = CanvasParams::load_json_file(path)?;
            let mut session = Session::from_params(&params)?;
            println!("Editor: {} | cell size {}px", session.kind(), params.cell_size);
            print_map(&mut session, params.picked_color);
            print_slots(&session);
            print_violations(&session);
        }
        "repl" => {
            let path = args.get(2).context("missing <params.json>")?;
            let out = args
                .get(3)
                .cloned()
                .unwrap_or_else(|| "submission.json".to_string());
            repl(path, &out)?;
        }

        _ => print_help(),
    }

    Ok(())
}
