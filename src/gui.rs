use crate::grid::{Grid, InsertSide, MoveDirection};
use crate::store::TranslationStore;
use crate::{LocaleDir, statics};
use anyhow::Context;
use eframe::egui;
use egui_extras::{Column, TableBuilder};
use std::path::{Path, PathBuf};

pub fn run_gui() -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };
    let title = format!("{} {}", statics::EN_APP_TITLE, env!("CARGO_PKG_VERSION"));
    eframe::run_native(
        &title,
        options,
        Box::new(|cc| Ok(Box::new(LocGridApp::new(cc)))),
    )
}

/// Preferences carried between runs in eframe's app storage.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
struct Prefs {
    last_dir: Option<String>,
    theme_dark: bool,
}

impl Default for Prefs {
    fn default() -> Self {
        Self {
            last_dir: None,
            theme_dark: true,
        }
    }
}

/// One opened folder: the loaded files and the grid editing them.
/// Replaced wholesale when another folder is opened.
struct Session {
    store: TranslationStore,
    grid: Grid,
}

/// Table interactions collected while drawing and applied once the table is done.
#[derive(Clone, Debug, PartialEq)]
enum GridOp {
    Select(usize),
    CommitKey(usize),
    CommitHeader(usize),
    EditCell {
        row: usize,
        file: String,
        text: String,
    },
    Insert {
        anchor: usize,
        side: InsertSide,
    },
    RequestDelete(usize),
}

/// The main application state and GUI logic.
#[derive(Default)]
struct LocGridApp {
    session: Option<Session>,
    last_dir: Option<String>,
    now: f64,
    status: String,
    status_until: f64,
    last_error: Option<String>,

    add_language_open: bool,
    add_language_input: String,
    add_language_request_focus: bool,

    // Row index + key awaiting delete confirmation.
    pending_delete: Option<(usize, String)>,

    about_open: bool,
    theme_dark: bool,
}

impl LocGridApp {
    fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let prefs: Prefs = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, statics::STORAGE_KEY_PREFS))
            .unwrap_or_default();
        let app = Self::with_prefs(prefs);
        cc.egui_ctx.set_visuals(Self::visuals(app.theme_dark));
        app
    }

    fn with_prefs(prefs: Prefs) -> Self {
        Self {
            last_dir: prefs.last_dir,
            theme_dark: prefs.theme_dark,
            ..Default::default()
        }
    }

    fn prefs(&self) -> Prefs {
        Prefs {
            last_dir: self.last_dir.clone(),
            theme_dark: self.theme_dark,
        }
    }

    fn visuals(dark: bool) -> egui::Visuals {
        if dark {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        }
    }

    fn show_status(&mut self, msg: impl Into<String>) {
        self.status = msg.into();
        self.status_until = self.now + statics::STATUS_TTL_SECS;
    }

    fn pick_folder(&mut self) {
        let mut dlg = rfd::FileDialog::new();
        if let Some(dir) = self.last_dir.as_deref() {
            dlg = dlg.set_directory(dir);
        }
        let Some(path) = dlg.pick_folder() else {
            return;
        };
        self.open_folder(&path);
    }

    fn load_session(path: &Path) -> anyhow::Result<Session> {
        let dir = LocaleDir::open(path)?;
        let store = TranslationStore::load(dir)
            .with_context(|| format!("loading {}", path.display()))?;
        let grid = Grid::new(&store);
        Ok(Session { store, grid })
    }

    fn open_folder(&mut self, path: &Path) {
        match Self::load_session(path) {
            Ok(session) => {
                self.last_dir = Some(path.to_string_lossy().into_owned());
                self.pending_delete = None;
                self.last_error = if session.store.skipped.is_empty() {
                    None
                } else {
                    let names: Vec<&str> = session
                        .store
                        .skipped
                        .iter()
                        .map(|s| s.name.as_str())
                        .collect();
                    Some(format!("{} {}", statics::EN_LABEL_SKIPPED, names.join(", ")))
                };
                let msg = format!(
                    "{} {} ({} files, {} rows)",
                    statics::EN_STATUS_LOADED,
                    path.display(),
                    session.store.file_count(),
                    session.store.row_count()
                );
                self.session = Some(session);
                self.show_status(msg);
            }
            Err(e) => {
                self.last_error = Some(format!("Failed to open: {e:#}"));
            }
        }
    }

    fn save_all(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let pending = session.grid.commit_pending(&mut session.store);
        let result = session.store.save();

        match result {
            Ok(summary) => {
                self.last_error = pending.first().map(|e| e.to_string());
                self.show_status(format!(
                    "{} {} files \u{2714}",
                    statics::EN_STATUS_SAVED,
                    summary.written.len()
                ));
            }
            Err(e) => {
                self.last_error = Some(format!("Failed to save: {:#}", anyhow::Error::from(e)));
            }
        }
    }

    fn add_key(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let row = session.grid.append_row(&mut session.store);
        session.grid.select(row);
    }

    fn add_language(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            return true;
        };
        match session
            .grid
            .add_language(&mut session.store, &self.add_language_input)
        {
            Ok(name) => {
                self.show_status(format!("{} {name}", statics::EN_STATUS_ADDED_LANGUAGE));
                true
            }
            Err(e) => {
                self.show_status(e.to_string());
                false
            }
        }
    }

    fn refresh(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.grid.refresh(&mut session.store);
        }
    }

    fn move_selected(&mut self, direction: MoveDirection) {
        if let Some(session) = self.session.as_mut() {
            session.grid.move_selected(&mut session.store, direction);
        }
    }

    fn delete_row(&mut self, row: usize, expected_key: &str) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        // Rows may have shifted since the dialog was opened.
        if session.store.key_at(row) != Some(expected_key) {
            return;
        }
        match session.grid.delete_row(&mut session.store, row) {
            Ok(key) if !key.is_empty() => {
                self.show_status(format!("{} {key}", statics::EN_STATUS_DELETED));
            }
            Ok(_) => {}
            Err(e) => self.last_error = Some(e.to_string()),
        }
    }

    fn pointer_side(pointer_y: Option<f32>, cell: egui::Rect) -> InsertSide {
        let y = pointer_y.unwrap_or(cell.bottom());
        InsertSide::from_pointer(y, cell.top(), cell.bottom())
    }

    /// Draw the key/value table. Returns the interactions to apply afterwards.
    fn render_grid(ui: &mut egui::Ui, store: &TranslationStore, grid: &mut Grid) -> Vec<GridOp> {
        let mut ops = Vec::new();
        let files: Vec<String> = store.file_names().map(str::to_string).collect();
        let row_h = ui.text_style_height(&egui::TextStyle::Body) + 8.0;
        let selected = grid.selected();

        TableBuilder::new(ui)
            .striped(true)
            .sense(egui::Sense::click())
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::initial(statics::KEY_COL_WIDTH).resizable(true).clip(true))
            .columns(
                Column::initial(statics::VALUE_COL_WIDTH)
                    .resizable(true)
                    .clip(true),
                files.len(),
            )
            .header(row_h, |mut header| {
                header.col(|ui| {
                    ui.strong(statics::EN_COL_KEY);
                });
                for col in 0..files.len() {
                    header.col(|ui| {
                        let Some(buf) = grid.header_buffer_mut(col) else {
                            return;
                        };
                        let resp = ui.add(
                            egui::TextEdit::singleline(buf)
                                .id_salt(("header", col))
                                .font(egui::TextStyle::Monospace)
                                .desired_width(f32::INFINITY),
                        );
                        if resp.lost_focus() {
                            ops.push(GridOp::CommitHeader(col));
                        }
                    });
                }
            })
            .body(|body| {
                body.rows(row_h, store.row_count(), |mut row| {
                    let idx = row.index();
                    let key = store.key_at(idx).unwrap_or_default();
                    row.set_selected(selected == Some(idx));

                    row.col(|ui| {
                        let Some(buf) = grid.key_buffer_mut(idx) else {
                            return;
                        };
                        let resp = ui.add(
                            egui::TextEdit::singleline(buf)
                                .id_salt(("key", idx))
                                .font(egui::TextStyle::Monospace)
                                .hint_text(statics::EN_HINT_NEW_KEY)
                                .desired_width(f32::INFINITY),
                        );
                        if resp.gained_focus() {
                            ops.push(GridOp::Select(idx));
                        }
                        if resp.lost_focus() {
                            ops.push(GridOp::CommitKey(idx));
                        }
                        resp.context_menu(|ui| {
                            if ui.button(statics::EN_MENU_INSERT_ABOVE).clicked() {
                                ops.push(GridOp::Insert {
                                    anchor: idx,
                                    side: InsertSide::Before,
                                });
                                ui.close();
                            }
                            if ui.button(statics::EN_MENU_INSERT_BELOW).clicked() {
                                ops.push(GridOp::Insert {
                                    anchor: idx,
                                    side: InsertSide::After,
                                });
                                ui.close();
                            }
                            ui.separator();
                            if ui.button(statics::EN_MENU_DELETE_ROW).clicked() {
                                ops.push(GridOp::RequestDelete(idx));
                                ui.close();
                            }
                        });
                    });

                    for file in &files {
                        let mut text = store.cell_text(file, key);
                        let mut insert_at: Option<Option<f32>> = None;
                        let (cell, _) = row.col(|ui| {
                            let resp = ui.add_enabled(
                                !key.is_empty(),
                                egui::TextEdit::singleline(&mut text)
                                    .id_salt(("cell", idx, file.as_str()))
                                    .desired_width(f32::INFINITY),
                            );
                            if resp.gained_focus() {
                                ops.push(GridOp::Select(idx));
                            }
                            if resp.changed() {
                                ops.push(GridOp::EditCell {
                                    row: idx,
                                    file: file.clone(),
                                    text: text.clone(),
                                });
                            }
                            if resp.secondary_clicked() {
                                insert_at = Some(ui.input(|i| i.pointer.interact_pos()).map(|p| p.y));
                            }
                        });
                        if let Some(pointer_y) = insert_at {
                            ops.push(GridOp::Insert {
                                anchor: idx,
                                side: Self::pointer_side(pointer_y, cell),
                            });
                        }
                    }

                    if row.response().clicked() {
                        ops.push(GridOp::Select(idx));
                    }
                });
            });

        ops
    }
}

impl LocGridApp {
    fn apply_ops(&mut self, ops: Vec<GridOp>) {
        for op in ops {
            let Some(session) = self.session.as_mut() else {
                return;
            };
            let Session { store, grid } = session;
            let result = match op {
                GridOp::Select(row) => {
                    grid.select(row);
                    Ok(())
                }
                GridOp::CommitKey(row) => grid.commit_key(store, row).map(|_| ()),
                GridOp::CommitHeader(col) => grid.commit_header(store, col).map(|_| ()),
                GridOp::EditCell { row, file, text } => grid.edit_cell(store, row, &file, &text),
                GridOp::Insert { anchor, side } => grid.insert_row(store, anchor, side).map(|row| {
                    grid.select(row);
                }),
                GridOp::RequestDelete(row) => match store.key_at(row).map(str::to_string) {
                    Some(key) if key.is_empty() => grid.delete_row(store, row).map(|_| ()),
                    Some(key) => {
                        self.pending_delete = Some((row, key));
                        Ok(())
                    }
                    None => Ok(()),
                },
            };
            if let Err(e) = result {
                self.show_status(e.to_string());
            }
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let save = ctx.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::S));
        if save {
            self.save_all();
        }

        // Arrow keys belong to text fields while one has focus.
        if ctx.memory(|m| m.focused().is_some()) {
            return;
        }
        let (up, down) = ctx.input_mut(|i| {
            (
                i.consume_key(egui::Modifiers::NONE, egui::Key::ArrowUp),
                i.consume_key(egui::Modifiers::NONE, egui::Key::ArrowDown),
            )
        });
        if up {
            self.move_selected(MoveDirection::Up);
        }
        if down {
            self.move_selected(MoveDirection::Down);
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                if ui.button(statics::EN_BTN_OPEN_FOLDER).clicked() {
                    self.pick_folder();
                }

                let has_session = self.session.is_some();
                if ui
                    .add_enabled(has_session, egui::Button::new(statics::EN_BTN_SAVE))
                    .clicked()
                {
                    self.save_all();
                }
                if ui
                    .add_enabled(has_session, egui::Button::new(statics::EN_BTN_ADD_KEY))
                    .clicked()
                {
                    self.add_key();
                }
                if ui
                    .add_enabled(has_session, egui::Button::new(statics::EN_BTN_ADD_LANGUAGE))
                    .clicked()
                {
                    self.add_language_open = true;
                    self.add_language_input.clear();
                    self.add_language_request_focus = true;
                }
                if ui
                    .add_enabled(has_session, egui::Button::new(statics::EN_BTN_REFRESH))
                    .clicked()
                {
                    self.refresh();
                }

                ui.separator();
                let has_selection = self
                    .session
                    .as_ref()
                    .is_some_and(|s| s.grid.selected().is_some());
                if ui
                    .add_enabled(has_selection, egui::Button::new(statics::EN_BTN_UP))
                    .clicked()
                {
                    self.move_selected(MoveDirection::Up);
                }
                if ui
                    .add_enabled(has_selection, egui::Button::new(statics::EN_BTN_DOWN))
                    .clicked()
                {
                    self.move_selected(MoveDirection::Down);
                }

                ui.separator();
                if ui.button(statics::EN_BTN_ABOUT).clicked() {
                    self.about_open = true;
                }
                if ui.button(statics::EN_BTN_TOGGLE_THEME).clicked() {
                    self.theme_dark = !self.theme_dark;
                    ctx.set_visuals(Self::visuals(self.theme_dark));
                }

                if let Some(session) = self.session.as_ref() {
                    ui.separator();
                    if let Some(dir) = session.store.dir() {
                        ui.monospace(dir.name());
                    }
                    ui.label(format!(
                        "{} {}",
                        statics::EN_LABEL_ROWS,
                        session.store.row_count()
                    ));
                }
            });
        });
    }

    fn render_windows(&mut self, ctx: &egui::Context) {
        if self.add_language_open {
            let mut open = self.add_language_open;
            let mut close_requested = false;
            egui::Window::new(statics::EN_WINDOW_ADD_LANGUAGE)
                .collapsible(false)
                .resizable(false)
                .open(&mut open)
                .show(ctx, |ui| {
                    ui.label(statics::EN_ADD_LANGUAGE_PROMPT);
                    let resp = ui.add(
                        egui::TextEdit::singleline(&mut self.add_language_input)
                            .hint_text(statics::EN_ADD_LANGUAGE_HINT),
                    );
                    if self.add_language_request_focus {
                        resp.request_focus();
                        self.add_language_request_focus = false;
                    }
                    let pressed_enter =
                        resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                    ui.horizontal(|ui| {
                        if (ui.button(statics::EN_BTN_ADD).clicked() || pressed_enter)
                            && self.add_language()
                        {
                            close_requested = true;
                        }
                        if ui.button(statics::EN_BTN_CANCEL).clicked() {
                            close_requested = true;
                        }
                    });
                });
            self.add_language_open = open && !close_requested;
        }

        if let Some((row, key)) = self.pending_delete.clone() {
            let mut decision = None;
            egui::Window::new(statics::EN_WINDOW_DELETE_KEY)
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(format!("Delete key \"{key}\" in all languages?"));
                    ui.horizontal(|ui| {
                        if ui.button(statics::EN_BTN_DELETE).clicked() {
                            decision = Some(true);
                        }
                        if ui.button(statics::EN_BTN_CANCEL).clicked() {
                            decision = Some(false);
                        }
                    });
                });
            if let Some(confirmed) = decision {
                self.pending_delete = None;
                if confirmed {
                    self.delete_row(row, &key);
                }
            }
        }

        if self.about_open {
            let mut open = self.about_open;
            egui::Window::new(statics::EN_WINDOW_ABOUT)
                .collapsible(false)
                .open(&mut open)
                .show(ctx, |ui| {
                    ui.heading(statics::EN_ABOUT_HEADING);
                    ui.label(format!(
                        "{} {}",
                        statics::EN_ABOUT_VERSION,
                        env!("CARGO_PKG_VERSION")
                    ));
                    ui.separator();
                    ui.label(statics::EN_ABOUT_SHORTCUTS);
                    ui.label(statics::EN_ABOUT_SHORTCUT_SAVE);
                    ui.label(statics::EN_ABOUT_SHORTCUT_MOVE);
                    ui.label(statics::EN_ABOUT_SHORTCUT_MENU);
                });
            self.about_open = open;
        }
    }

    fn render_status_toast(&mut self, ctx: &egui::Context) {
        if self.status.is_empty() {
            return;
        }
        if self.now >= self.status_until {
            self.status.clear();
            return;
        }

        egui::Area::new(egui::Id::new("status_toast"))
            .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -10.0))
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.label(&self.status);
                });
            });
        ctx.request_repaint_after(std::time::Duration::from_secs_f64(
            self.status_until - self.now,
        ));
    }

    fn render_home(&mut self, ctx: &egui::Context) {
        let mut reopen = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(statics::EN_HOME_HEADING);
            ui.label(statics::EN_HOME_INSTRUCTIONS);
            if let Some(dir) = self.last_dir.as_deref() {
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    ui.label(statics::EN_HINT_LAST_DIR);
                    ui.monospace(dir);
                    if ui.button(statics::EN_BTN_REOPEN).clicked() {
                        reopen = Some(PathBuf::from(dir));
                    }
                });
            }
        });
        if let Some(path) = reopen {
            self.open_folder(&path);
        }
    }
}

impl eframe::App for LocGridApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.now = ctx.input(|i| i.time);
        self.handle_shortcuts(ctx);
        self.render_top_bar(ctx);

        if let Some(err) = self.last_error.clone() {
            egui::TopBottomPanel::top("error_bar").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(egui::Color32::RED, err);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button(statics::EN_BTN_CLEAR).clicked() {
                            self.last_error = None;
                        }
                    });
                });
            });
        }

        self.render_windows(ctx);
        self.render_status_toast(ctx);

        if self.session.is_none() {
            self.render_home(ctx);
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let mut ops = Vec::new();
        let mut table_rect = egui::Rect::NOTHING;
        let panel_rect = egui::CentralPanel::default()
            .show(ctx, |ui| {
                egui::ScrollArea::horizontal()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        ops = Self::render_grid(ui, &session.store, &mut session.grid);
                        table_rect = ui.min_rect();
                    });
            })
            .response
            .rect;

        // A click in the panel but outside the table clears the row selection.
        let clicked_outside = ctx.input(|i| {
            i.pointer.primary_clicked()
                && i.pointer
                    .interact_pos()
                    .is_some_and(|pos| panel_rect.contains(pos) && !table_rect.contains(pos))
        });
        if clicked_outside {
            session.grid.clear_selection();
        }

        self.apply_ops(ops);
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, statics::STORAGE_KEY_PREFS, &self.prefs());
    }
}
