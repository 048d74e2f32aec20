//! Landing screen

use eframe::egui::{self, RichText};

use crate::app::CodeshareApp;
use crate::core::document::DocumentId;

/// Landing screen with entry points into the editor
pub struct HomePanel;

impl HomePanel {
    pub fn show(ui: &mut egui::Ui, app: &mut CodeshareApp) {
        let mut open: Option<DocumentId> = None;

        ui.vertical_centered(|ui| {
            ui.add_space(80.0);
            ui.heading(RichText::new("Share Code & Text Instantly").size(32.0));
            ui.add_space(12.0);
            ui.label("Paste, edit and share. Everything is saved as you type.");
            ui.add_space(24.0);

            ui.horizontal(|ui| {
                // Keep the two buttons centered
                let width = 260.0;
                ui.add_space(((ui.available_width() - width) / 2.0).max(0.0));
                if ui.button(RichText::new("New Document").size(16.0)).clicked() {
                    open = Some(DocumentId::generate());
                }
                if ui.button(RichText::new("Open...").size(16.0)).clicked() {
                    app.open_dialog.show();
                }
            });

            if !app.config.recent_documents.is_empty() {
                ui.add_space(32.0);
                ui.label(RichText::new("Recent documents").strong());
                ui.add_space(4.0);
                for recent in &app.config.recent_documents {
                    if ui.link(RichText::new(recent).monospace()).clicked() {
                        match DocumentId::parse(recent) {
                            Ok(id) => open = Some(id),
                            Err(e) => tracing::error!("{}", e),
                        }
                    }
                }
            }

            ui.add_space(32.0);
            ui.label(RichText::new("Ctrl+N new document · Ctrl+S save now · Ctrl+Shift+C copy link").small().weak());
        });

        if let Some(id) = open {
            app.open_document(id);
        }
    }
}
