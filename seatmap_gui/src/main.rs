use anyhow::Context;
use eframe::egui;
use seatmap_core::{CanvasParams, Color, DrawStyle, PxRect, Session, SlotId, Surface};
use std::fs;

fn main() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let params_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "params.json".to_string());
    let out_path = std::env::args()
        .nth(2)
        .unwrap_or_else(|| "submission.json".to_string());

    let app = SeatMapApp::new(params_path, out_path)?;

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "SeatMap Editor",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("run editor window: {e}"))
}

fn to_color32(c: Color) -> egui::Color32 {
    egui::Color32::from_rgb(c.r, c.g, c.b)
}

/// Draws onto an egui painter, offset to where the canvas was allocated.
struct PainterSurface<'a> {
    painter: &'a egui::Painter,
    origin: egui::Pos2,
    style: DrawStyle,
}

impl PainterSurface<'_> {
    fn at(&self, x: f32, y: f32) -> egui::Pos2 {
        self.origin + egui::vec2(x, y)
    }

    fn rect(&self, r: PxRect) -> egui::Rect {
        egui::Rect::from_min_size(self.at(r.x, r.y), egui::vec2(r.w, r.h))
    }
}

impl Surface for PainterSurface<'_> {
    fn resize(&mut self, width_px: u32, height_px: u32) {
        // egui reallocates every frame; the new size is picked up from the grid
        tracing::debug!(width_px, height_px, "canvas resized");
    }

    fn apply_style(&mut self, style: &DrawStyle) {
        self.style = *style;
    }

    fn clear(&mut self, width_px: u32, height_px: u32) {
        let r = PxRect {
            x: 0.0,
            y: 0.0,
            w: width_px as f32,
            h: height_px as f32,
        };
        self.painter
            .rect_filled(self.rect(r), 0.0, egui::Color32::WHITE);
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Color) {
        self.painter.line_segment(
            [self.at(from.0, from.1), self.at(to.0, to.1)],
            egui::Stroke::new(self.style.line_width, to_color32(color)),
        );
    }

    fn fill_rect(&mut self, rect: PxRect, color: Color) {
        self.painter
            .rect_filled(self.rect(rect), 0.0, to_color32(color));
    }

    fn stroke_rect(&mut self, rect: PxRect, color: Color) {
        self.painter.rect_stroke(
            self.rect(rect),
            0.0,
            egui::Stroke::new(self.style.outline_width, to_color32(color)),
        );
    }

    fn text(&mut self, text: &str, baseline: (f32, f32), _max_width: f32, color: Color) {
        self.painter.text(
            self.at(baseline.0, baseline.1),
            egui::Align2::LEFT_BOTTOM,
            text,
            egui::FontId::proportional(self.style.font_px),
            to_color32(color),
        );
    }
}

struct SeatMapApp {
    params_path: String,
    out_path: String,
    session: Session,

    // UI state
    last_status: Option<String>,
    last_error: Option<String>,
}

impl SeatMapApp {
    fn new(params_path: String, out_path: String) -> anyhow::Result<Self> {
        let params = CanvasParams::load_json_file(&params_path)
            .with_context(|| format!("load params file: {params_path}"))?;
        let session = Session::from_params(&params)?;

        Ok(Self {
            params_path,
            out_path,
            session,
            last_status: None,
            last_error: None,
        })
    }

    fn safe_submit(&mut self) {
        let result = self
            .session
            .submission_json()
            .context("serialize submission")
            .and_then(|json| {
                fs::write(&self.out_path, json)
                    .with_context(|| format!("write submission: {}", self.out_path))
            });
        match result {
            Ok(()) => {
                self.last_error = None;
                self.last_status = Some(format!("Saved {}", self.out_path));
            }
            Err(e) => self.last_error = Some(format!("{e:#}")),
        }
    }

    fn slot_controls(&mut self, ui: &mut egui::Ui) {
        let Some(ed) = self.session.slotted_mut() else {
            return;
        };

        let entries = ed.selection_entries();
        let current = ed.current_slot();
        let mut picked: Option<SlotId> = None;

        ui.horizontal(|ui| {
            ui.label("Slot:");
            let selected_text = current
                .and_then(|id| entries.iter().find(|e| e.id == id))
                .map(|e| e.label.clone())
                .unwrap_or_else(|| "(none)".to_string());
            egui::ComboBox::from_id_source("slot_select")
                .selected_text(selected_text)
                .width(320.0)
                .show_ui(ui, |ui| {
                    for e in &entries {
                        let text = egui::RichText::new(&e.label).color(to_color32(e.color));
                        if ui.selectable_label(current == Some(e.id), text).clicked() {
                            picked = Some(e.id);
                        }
                    }
                });

            if ui.button("Add slot").clicked() {
                ed.create_slot();
            }
            if ui.button("Remove slot").clicked() {
                ed.delete_current_slot();
            }
        });

        if let Some(id) = picked {
            ed.select_slot(id);
        }
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let g = *self.session.grid();
        let size = egui::vec2(g.width_px() as f32, g.height_px() as f32);
        let (response, painter) = ui.allocate_painter(size, egui::Sense::click_and_drag());
        let origin = response.rect.min;

        let (pressed, released, pointer) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.latest_pos(),
            )
        });

        // hovered() is false while a popup covers the canvas
        let over = response.hovered() || response.is_pointer_button_down_on();
        match pointer {
            Some(pos) if over => {
                let local = pos - origin;
                if pressed && response.hovered() {
                    self.session.pointer_down_px(local.x, local.y);
                } else {
                    self.session.pointer_move_px(local.x, local.y);
                }
            }
            _ => {
                self.session.pointer_leave();
            }
        }
        if released {
            self.session.pointer_up();
        }

        // egui is immediate mode, so every frame is a full redraw anyway
        let mut surface = PainterSurface {
            painter: &painter,
            origin,
            style: DrawStyle::default(),
        };
        self.session.paint(&mut surface);
    }
}

impl eframe::App for SeatMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("SeatMap Editor");
                ui.separator();
                ui.label(format!("File: {}", self.params_path));
                ui.separator();
                ui.label(format!("Mode: {}", self.session.kind()));
                ui.separator();
                if ui.button("Submit").clicked() {
                    self.safe_submit();
                }
            });

            self.slot_controls(ui);

            for v in self.session.violations() {
                ui.colored_label(egui::Color32::RED, v.to_string());
            }
            if let Some(status) = &self.last_status {
                ui.label(status);
            }
            if let Some(err) = &self.last_error {
                ui.colored_label(egui::Color32::RED, format!("Error: {err}"));
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| {
                self.canvas(ui);
            });
        });
    }
}
