//! Main application state and UI coordination

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use eframe::egui;

use crate::core::config::AppConfig;
use crate::core::document::DocumentId;
use crate::session::EditorSession;
use crate::store::{HttpStore, StoreWorker};
use crate::ui::{editor::EditorPanel, home::HomePanel, open_dialog::OpenDialog};

/// Which screen is showing
#[derive(Debug)]
pub enum Route {
    /// Landing screen
    Home,
    /// Editing a document
    Editor(EditorSession),
}

/// Main application state
pub struct CodeshareApp {
    /// Application configuration
    pub config: AppConfig,
    /// Current screen
    pub route: Route,
    /// Background store access
    pub worker: StoreWorker<HttpStore>,
    /// "Open document" dialog state
    pub open_dialog: OpenDialog,
}

impl CodeshareApp {
    /// Create a new application instance
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: AppConfig,
        start: Option<DocumentId>,
    ) -> Result<Self> {
        Self::configure_style(&cc.egui_ctx, &config);

        let store = HttpStore::new(config.api_base(), config.store.request_timeout())
            .context("Failed to build document store client")?;

        let ctx = cc.egui_ctx.clone();
        let worker = StoreWorker::new(store, Some(Arc::new(move || ctx.request_repaint())))
            .context("Failed to start document store worker")?;

        tracing::info!("Using document store at {}", config.api_base());

        let mut app = Self {
            config,
            route: Route::Home,
            worker,
            open_dialog: OpenDialog::default(),
        };

        if let Some(id) = start {
            app.open_document(id);
        }

        Ok(app)
    }

    /// Apply theme and editor font size
    fn configure_style(ctx: &egui::Context, config: &AppConfig) {
        let theme = if config.ui.theme == "light" {
            egui::Theme::Light
        } else {
            egui::Theme::Dark
        };
        ctx.set_theme(theme);

        let font_size = config.editor.font_size;
        ctx.style_mut(|style| {
            if let Some(font) = style.text_styles.get_mut(&egui::TextStyle::Monospace) {
                font.size = font_size;
            }
        });
    }

    /// Open a document, saving whatever the current one has pending
    pub fn open_document(&mut self, id: DocumentId) {
        if let Route::Editor(ref mut session) = self.route {
            if session.id() == &id {
                return;
            }
            session.save_now(&self.worker);
        }

        self.config.add_recent_document(id.as_str());
        if let Err(e) = self.config.save() {
            tracing::error!("Failed to save config: {}", e);
        }

        let session = EditorSession::open(id, self.config.editor.autosave_debounce(), &self.worker);
        self.route = Route::Editor(session);
    }

    /// Start a brand new document
    pub fn new_document(&mut self) {
        self.open_document(DocumentId::generate());
    }

    /// Leave the editor for the landing screen
    pub fn go_home(&mut self) {
        if let Route::Editor(ref mut session) = self.route {
            session.save_now(&self.worker);
        }
        self.route = Route::Home;
    }

    /// Save the active document without waiting for the debounce
    pub fn save_now(&mut self) {
        if let Route::Editor(ref mut session) = self.route {
            session.save_now(&self.worker);
        }
    }

    /// Copy the active document's link to the clipboard
    pub fn share_active(&mut self, ctx: &egui::Context) {
        if let Route::Editor(ref mut session) = self.route {
            let url = session.share(
                self.config.share_base(),
                Instant::now(),
                self.config.ui.toast_duration(),
            );
            ctx.copy_text(url);
        }
    }

    /// Route store events and fire due saves
    fn pump_store(&mut self, ctx: &egui::Context, now: Instant) {
        let events = self.worker.drain_events();
        match self.route {
            Route::Editor(ref mut session) => {
                for event in events {
                    session.handle_event(event);
                }
                if let Some(wait) = session.tick(&self.worker, now) {
                    ctx.request_repaint_after(wait);
                }
            }
            Route::Home => {
                if !events.is_empty() {
                    tracing::debug!("Dropping {} store events on home screen", events.len());
                }
            }
        }
    }

    /// Window is closing: do not lose pending or in-flight saves
    fn on_close_requested(&mut self) {
        let timeout = self.config.store.request_timeout();
        match self.route {
            Route::Editor(ref mut session) => session.flush_blocking(&self.worker, timeout),
            // Leaving the editor may have just queued a save
            Route::Home => {
                if !self.worker.wait_idle(timeout) {
                    tracing::error!("Timed out waiting for saves before closing");
                }
            }
        }
        tracing::info!("Shutting down");
    }

    /// Render the top menu bar
    fn render_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("New Document").clicked() {
                        self.new_document();
                        ui.close();
                    }
                    if ui.button("Open...").clicked() {
                        self.open_dialog.show();
                        ui.close();
                    }
                    if ui.button("Home").clicked() {
                        self.go_home();
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Save Now").clicked() {
                        self.save_now();
                        ui.close();
                    }
                    if ui.button("Copy Share Link").clicked() {
                        self.share_active(ctx);
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("View", |ui| {
                    let editor = &mut self.config.editor;
                    let mut changed = ui.checkbox(&mut editor.show_line_numbers, "Line Numbers").changed();
                    changed |= ui.checkbox(&mut editor.word_wrap, "Word Wrap").changed();
                    ui.separator();
                    if ui.selectable_label(self.config.ui.theme == "dark", "Dark Theme").clicked() {
                        self.config.ui.theme = "dark".to_string();
                        changed = true;
                    }
                    if ui.selectable_label(self.config.ui.theme == "light", "Light Theme").clicked() {
                        self.config.ui.theme = "light".to_string();
                        changed = true;
                    }
                    if changed {
                        Self::configure_style(ctx, &self.config);
                        if let Err(e) = self.config.save() {
                            tracing::error!("Failed to save config: {}", e);
                        }
                    }
                });
            });
        });
    }
}

impl eframe::App for CodeshareApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        // Handle keyboard shortcuts
        let (save, new, share) = ctx.input(|i| {
            (
                i.modifiers.command && i.key_pressed(egui::Key::S),
                i.modifiers.command && i.key_pressed(egui::Key::N),
                i.modifiers.command && i.modifiers.shift && i.key_pressed(egui::Key::C),
            )
        });
        if save {
            self.save_now();
        }
        if new {
            self.new_document();
        }
        if share {
            self.share_active(ctx);
        }

        self.pump_store(ctx, now);

        if ctx.input(|i| i.viewport().close_requested()) {
            self.on_close_requested();
        }

        self.render_menu_bar(ctx);

        if let Some(id) = self.open_dialog.ui(ctx) {
            self.open_document(id);
        }

        match self.route {
            Route::Home => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    HomePanel::show(ui, self);
                });
            }
            Route::Editor(_) => EditorPanel::show(ctx, self, now),
        }
    }
}
