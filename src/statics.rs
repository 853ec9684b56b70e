// Central place for UI strings and other non-localized constants.
// Keep these out of gui.rs to reduce duplication and make tweaks safer.

// English UI strings (EN_ prefix to make future localization easier)
pub const EN_APP_TITLE: &str = "Locale Grid";

pub const EN_BTN_OPEN_FOLDER: &str = "Open Folder...";
pub const EN_BTN_SAVE: &str = "Save";
pub const EN_BTN_ADD_KEY: &str = "Add Key";
pub const EN_BTN_ADD_LANGUAGE: &str = "Add Language";
pub const EN_BTN_REFRESH: &str = "Refresh";
pub const EN_BTN_ABOUT: &str = "About";
pub const EN_BTN_TOGGLE_THEME: &str = "Theme";
pub const EN_BTN_REOPEN: &str = "Reopen";
pub const EN_BTN_ADD: &str = "Add";
pub const EN_BTN_DELETE: &str = "Delete";
pub const EN_BTN_CANCEL: &str = "Cancel";
pub const EN_BTN_CLEAR: &str = "Clear";
pub const EN_BTN_UP: &str = "Up";
pub const EN_BTN_DOWN: &str = "Down";

pub const EN_MENU_DELETE_ROW: &str = "Delete row";
pub const EN_MENU_INSERT_ABOVE: &str = "Insert row above";
pub const EN_MENU_INSERT_BELOW: &str = "Insert row below";

pub const EN_WINDOW_ABOUT: &str = "About";
pub const EN_WINDOW_ADD_LANGUAGE: &str = "Add Language";
pub const EN_WINDOW_DELETE_KEY: &str = "Delete Key";

pub const EN_ABOUT_HEADING: &str = "Locale Grid";
pub const EN_ABOUT_VERSION: &str = "Version:";
pub const EN_ABOUT_SHORTCUTS: &str = "Shortcuts:";
pub const EN_ABOUT_SHORTCUT_SAVE: &str = "- Ctrl+S / Cmd+S: Save all files";
pub const EN_ABOUT_SHORTCUT_MOVE: &str = "- Up / Down: Move the selected row";
pub const EN_ABOUT_SHORTCUT_MENU: &str =
    "- Right-click a key to delete its row, a value to insert a row above/below";

pub const EN_HOME_HEADING: &str = "Locale Grid";
pub const EN_HOME_INSTRUCTIONS: &str = "Open a folder of JSON locale files to begin.";
pub const EN_HINT_LAST_DIR: &str = "Tip: reopen the last folder:";

pub const EN_COL_KEY: &str = "Key";

pub const EN_ADD_LANGUAGE_PROMPT: &str = "New language filename (e.g. fr.json):";
pub const EN_ADD_LANGUAGE_HINT: &str = "fr.json";
pub const EN_HINT_NEW_KEY: &str = "new.key";

pub const EN_STATUS_SAVED: &str = "Saved";
pub const EN_STATUS_DELETED: &str = "Deleted:";
pub const EN_STATUS_LOADED: &str = "Loaded";
pub const EN_STATUS_ADDED_LANGUAGE: &str = "Added";

pub const EN_LABEL_ROWS: &str = "rows:";
pub const EN_LABEL_SKIPPED: &str = "skipped (invalid JSON):";

// Seconds a status message stays visible.
pub const STATUS_TTL_SECS: f64 = 1.2;

// Keys in eframe app storage.
pub const STORAGE_KEY_PREFS: &str = "prefs";

// Table geometry.
pub const KEY_COL_WIDTH: f32 = 260.0;
pub const VALUE_COL_WIDTH: f32 = 220.0;

// Newline constants (used for save formatting; keep out of store code).
pub const NL_LF: &str = "\n";
pub const NL_CRLF: &str = "\r\n";
