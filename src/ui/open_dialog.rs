//! "Open document" window accepting an id or a share link

use eframe::egui;

use crate::core::document::DocumentId;

#[derive(Debug, Default)]
pub struct OpenDialog {
    open: bool,
    input: String,
    error: Option<String>,
}

impl OpenDialog {
    pub fn show(&mut self) {
        self.open = true;
        self.input.clear();
        self.error = None;
    }

    /// Validate the current input, closing the dialog on success
    pub fn submit(&mut self) -> Option<DocumentId> {
        match DocumentId::parse(&self.input) {
            Ok(id) => {
                self.open = false;
                self.error = None;
                Some(id)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }

    /// Draw the window; returns the document to open once confirmed
    pub fn ui(&mut self, ctx: &egui::Context) -> Option<DocumentId> {
        if !self.open {
            return None;
        }

        let mut result = None;
        let mut keep_open = true;

        egui::Window::new("Open Document")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .open(&mut keep_open)
            .show(ctx, |ui| {
                ui.label("Document id or share link:");
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.input)
                        .hint_text("e.g. aB3dE9xZ")
                        .desired_width(280.0),
                );
                response.request_focus();

                let enter = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                if let Some(ref error) = self.error {
                    ui.colored_label(ui.visuals().error_fg_color, error);
                }

                ui.horizontal(|ui| {
                    if ui.button("Open").clicked() || enter {
                        result = self.submit();
                    }
                    if ui.button("Cancel").clicked() {
                        self.open = false;
                    }
                });
            });

        if !keep_open {
            self.open = false;
        }
        result
    }
}
