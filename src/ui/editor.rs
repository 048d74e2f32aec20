//! Document editor screen: header, line-numbered text surface and footer

use std::time::Instant;

use eframe::egui::{self, Color32, RichText};

use crate::app::{CodeshareApp, Route};
use crate::core::autosave::SaveStatus;
use crate::core::config::EditorConfig;
use crate::core::editing;
use crate::session::EditorSession;

const ACCENT: Color32 = Color32::from_rgb(96, 165, 250);
const TOAST_BG: Color32 = Color32::from_rgb(22, 163, 74);

/// Document editor screen
pub struct EditorPanel;

impl EditorPanel {
    /// Show the editor screen for the active session
    pub fn show(ctx: &egui::Context, app: &mut CodeshareApp, now: Instant) {
        let mut share_clicked = false;

        {
            let Route::Editor(ref mut session) = app.route else {
                return;
            };

            egui::TopBottomPanel::top("editor_header").show(ctx, |ui| {
                share_clicked = Self::show_header(ui, session);
            });

            egui::TopBottomPanel::bottom("editor_footer").show(ctx, |ui| {
                Self::show_footer(ui, session);
            });

            egui::CentralPanel::default().show(ctx, |ui| {
                if session.is_loading() {
                    Self::show_loading(ui);
                } else {
                    Self::show_surface(ui, session, &app.config.editor, now);
                }
            });

            if let Some(toast) = session.toast(now) {
                Self::show_toast(ctx, &toast.message);
            }
        }

        if share_clicked {
            app.share_active(ctx);
        }
    }

    /// Document id, save status and share button. Returns whether Share was clicked.
    fn show_header(ui: &mut egui::Ui, session: &EditorSession) -> bool {
        let mut share_clicked = false;
        ui.horizontal(|ui| {
            ui.label(RichText::new(session.id().as_str()).monospace().strong());

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let can_share = !session.is_loading();
                if ui
                    .add_enabled(can_share, egui::Button::new("Share"))
                    .on_hover_text("Copy link to clipboard")
                    .clicked()
                {
                    share_clicked = true;
                }

                let status = session.status();
                let color = match status {
                    SaveStatus::Failed => ui.visuals().error_fg_color,
                    _ => ACCENT,
                };
                ui.label(RichText::new(status.label()).small().color(color));
                if status.is_busy() {
                    ui.spinner();
                }
            });
        });
        share_clicked
    }

    fn show_footer(ui: &mut egui::Ui, session: &EditorSession) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("UTF-8").small().weak());
            ui.label(RichText::new("Plain Text").small().weak());

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(RichText::new(format!("Ln {}", session.line_count())).small().weak());
            });
        });
    }

    fn show_loading(ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space((ui.available_height() / 2.0 - 20.0).max(0.0));
            ui.spinner();
            ui.label(RichText::new("Loading document...").weak());
        });
    }

    /// Line numbers and text share one scroll area so they always scroll together
    fn show_surface(
        ui: &mut egui::Ui,
        session: &mut EditorSession,
        config: &EditorConfig,
        now: Instant,
    ) {
        let editor_id = egui::Id::new("document_editor");
        let ctx = ui.ctx().clone();

        // Pasted text is plain text with LF line endings
        ui.input_mut(|i| {
            for event in &mut i.events {
                if let egui::Event::Paste(text) = event {
                    *text = editing::normalize_newlines(text);
                }
            }
        });

        // Tab indents instead of moving focus
        let has_focus = ctx.memory(|m| m.has_focus(editor_id));
        if has_focus && ui.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::Tab)) {
            Self::indent_at_cursor(&ctx, editor_id, session, config.tab_size, now);
        }

        let scroll = if config.word_wrap {
            egui::ScrollArea::vertical()
        } else {
            egui::ScrollArea::both()
        };

        scroll
            .id_salt("editor_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.horizontal_top(|ui| {
                    if config.show_line_numbers {
                        let rows = editing::gutter_len(session.line_count(), config.min_gutter_lines);
                        ui.vertical(|ui| {
                            ui.add_space(2.0);
                            ui.add(
                                egui::Label::new(
                                    RichText::new(editing::gutter_text(rows))
                                        .monospace()
                                        .weak(),
                                )
                                .selectable(false),
                            );
                        });
                        ui.separator();
                    }

                    let response = egui::TextEdit::multiline(&mut session.document.content)
                        .id(editor_id)
                        .font(egui::TextStyle::Monospace)
                        .code_editor()
                        .frame(false)
                        .desired_width(f32::INFINITY)
                        .desired_rows(config.min_gutter_lines)
                        .show(ui);

                    if response.response.changed() {
                        session.on_edit(now);
                    }
                });
            });
    }

    /// Replace the selection with spaces and move the cursor past them
    fn indent_at_cursor(
        ctx: &egui::Context,
        editor_id: egui::Id,
        session: &mut EditorSession,
        width: usize,
        now: Instant,
    ) {
        let Some(mut state) = egui::TextEdit::load_state(ctx, editor_id) else {
            return;
        };
        let Some(range) = state.cursor.char_range() else {
            return;
        };

        let [start, end] = range.sorted_cursors();
        let cursor = editing::insert_indent(
            &mut session.document.content,
            start.index..end.index,
            width,
        );
        state
            .cursor
            .set_char_range(Some(egui::text::CCursorRange::one(egui::text::CCursor::new(cursor))));
        state.store(ctx, editor_id);
        session.on_edit(now);
    }

    fn show_toast(ctx: &egui::Context, message: &str) {
        egui::Area::new(egui::Id::new("share_toast"))
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-16.0, 44.0))
            .order(egui::Order::Foreground)
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::new()
                    .fill(TOAST_BG)
                    .corner_radius(6.0)
                    .inner_margin(egui::Margin::symmetric(12, 8))
                    .show(ui, |ui| {
                        ui.label(RichText::new(format!("✔ {}", message)).color(Color32::WHITE));
                    });
            });
    }
}
