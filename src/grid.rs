use crate::bridge::JSON_SUFFIX;
use crate::store::TranslationStore;

/// Where a new row goes relative to the row that was clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertSide {
    Before,
    After,
}

impl InsertSide {
    /// Upper half of the row inserts before it, lower half after it.
    pub fn from_pointer(pointer_y: f32, row_top: f32, row_bottom: f32) -> Self {
        if pointer_y < (row_top + row_bottom) / 2.0 {
            InsertSide::Before
        } else {
            InsertSide::After
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("key \"{0}\" is already used by another row")]
    DuplicateKey(String),
    #[error("key cannot be empty (delete the row instead)")]
    EmptyKey,
    #[error("language \"{0}\" already exists")]
    DuplicateLanguage(String),
    #[error("\"{0}\" is not a valid file name")]
    InvalidLanguageName(String),
    #[error("row {0} does not exist")]
    NoSuchRow(usize),
    #[error("no column named \"{0}\"")]
    NoSuchColumn(String),
}

/// Turn user input into a locale file name: trimmed, `.json` appended when missing.
pub fn normalize_language_name(input: &str) -> Result<String, GridError> {
    let name = input.trim();
    let invalid = || GridError::InvalidLanguageName(name.to_string());
    if name.is_empty() || name.contains(['/', '\\']) {
        return Err(invalid());
    }

    let name = if name.ends_with(JSON_SUFFIX) {
        name.to_string()
    } else {
        format!("{name}{JSON_SUFFIX}")
    };
    if name == JSON_SUFFIX {
        return Err(invalid());
    }
    Ok(name)
}

/// Controller between the editable table and a [`TranslationStore`].
///
/// Every edit goes straight into the store; the grid itself only keeps the text
/// of key and header cells while they are being typed, plus the selected row.
/// Key and header edits are committed when the cell loses focus.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    key_buffers: Vec<String>,
    header_buffers: Vec<String>,
    selected: Option<usize>,
}

impl Grid {
    pub fn new(store: &TranslationStore) -> Self {
        let mut grid = Self::default();
        grid.sync(store);
        grid
    }

    /// Rebuild every buffer from the store, dropping uncommitted typing.
    pub fn sync(&mut self, store: &TranslationStore) {
        self.key_buffers = store.key_order().to_vec();
        self.header_buffers = store.file_names().map(str::to_string).collect();
        if self.selected.is_some_and(|row| row >= store.row_count()) {
            self.selected = None;
        }
    }

    /// Re-run key reconciliation (keys present in files but missing from the rows)
    /// and redraw from the store.
    pub fn refresh(&mut self, store: &mut TranslationStore) {
        store.reconcile_key_order();
        self.sync(store);
    }

    pub fn key_buffer(&self, row: usize) -> Option<&str> {
        self.key_buffers.get(row).map(String::as_str)
    }

    pub fn key_buffer_mut(&mut self, row: usize) -> Option<&mut String> {
        self.key_buffers.get_mut(row)
    }

    pub fn header_buffer(&self, col: usize) -> Option<&str> {
        self.header_buffers.get(col).map(String::as_str)
    }

    pub fn header_buffer_mut(&mut self, col: usize) -> Option<&mut String> {
        self.header_buffers.get_mut(col)
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn select(&mut self, row: usize) {
        self.selected = Some(row);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Store the text of one value cell. Empty text clears the value.
    pub fn edit_cell(
        &mut self,
        store: &mut TranslationStore,
        row: usize,
        file: &str,
        text: &str,
    ) -> Result<(), GridError> {
        let key = store.key_at(row).ok_or(GridError::NoSuchRow(row))?;
        if key.is_empty() {
            return Err(GridError::EmptyKey);
        }
        let key = key.to_string();
        if !store.set_cell(file, &key, text) {
            return Err(GridError::NoSuchColumn(file.to_string()));
        }
        Ok(())
    }

    /// Commit the typed key of `row`. Returns whether the store changed.
    ///
    /// The key keeps its row index. Keys used by another row and empty keys are
    /// rejected, and the cell goes back to the committed key.
    pub fn commit_key(&mut self, store: &mut TranslationStore, row: usize) -> Result<bool, GridError> {
        let current = store.key_at(row).ok_or(GridError::NoSuchRow(row))?.to_string();
        let typed = self
            .key_buffers
            .get(row)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        // Padding alone is not an edit; loaded keys keep their exact text.
        if typed == current.trim() {
            self.set_key_buffer(row, current);
            return Ok(false);
        }

        let rejected = if typed.is_empty() {
            Some(GridError::EmptyKey)
        } else if store.find_key(&typed, Some(row)).is_some() {
            Some(GridError::DuplicateKey(typed.clone()))
        } else {
            None
        };
        if let Some(err) = rejected {
            self.set_key_buffer(row, current);
            return Err(err);
        }

        log::debug!("rename row {row}: {current:?} -> {typed:?}");
        store.rename_key(row, &typed);
        self.set_key_buffer(row, typed);
        Ok(true)
    }

    /// Add a blank row at the bottom. Returns its index.
    pub fn append_row(&mut self, store: &mut TranslationStore) -> usize {
        let row = store.insert_key(store.row_count(), "");
        self.after_insert(store, row);
        row
    }

    /// Add a blank row next to `anchor`. Returns its index.
    pub fn insert_row(
        &mut self,
        store: &mut TranslationStore,
        anchor: usize,
        side: InsertSide,
    ) -> Result<usize, GridError> {
        if anchor >= store.row_count() {
            return Err(GridError::NoSuchRow(anchor));
        }
        let at = match side {
            InsertSide::Before => anchor,
            InsertSide::After => anchor + 1,
        };
        let row = store.insert_key(at, "");
        self.after_insert(store, row);
        Ok(row)
    }

    fn after_insert(&mut self, store: &TranslationStore, row: usize) {
        log::debug!("insert blank row at {row}");
        if self.key_buffers.len() + 1 == store.row_count() {
            self.key_buffers.insert(row, String::new());
        } else {
            self.key_buffers = store.key_order().to_vec();
        }
        if let Some(sel) = self.selected
            && sel >= row
        {
            self.selected = Some(sel + 1);
        }
    }

    /// Delete `row` in every language. Returns the removed key (empty for blank rows).
    pub fn delete_row(&mut self, store: &mut TranslationStore, row: usize) -> Result<String, GridError> {
        let before = store.row_count();
        let key = store.remove_row(row).ok_or(GridError::NoSuchRow(row))?;
        log::debug!("delete row {row}: {key:?}");

        if store.row_count() + 1 == before && row < self.key_buffers.len() {
            self.key_buffers.remove(row);
            self.selected = match self.selected {
                Some(sel) if sel == row => None,
                Some(sel) if sel > row => Some(sel - 1),
                other => other,
            };
        } else {
            self.key_buffers = store.key_order().to_vec();
            self.selected = None;
        }
        Ok(key)
    }

    /// Swap the selected row with its neighbour. The selection follows the row.
    pub fn move_selected(&mut self, store: &mut TranslationStore, direction: MoveDirection) -> bool {
        let Some(row) = self.selected else {
            return false;
        };
        let target = match direction {
            MoveDirection::Up if row > 0 => row - 1,
            MoveDirection::Down if row + 1 < store.row_count() => row + 1,
            _ => return false,
        };
        if !store.swap_rows(row, target) {
            return false;
        }
        if target < self.key_buffers.len() && row < self.key_buffers.len() {
            self.key_buffers.swap(row, target);
        }
        self.selected = Some(target);
        true
    }

    /// Add an empty locale file as a new column.
    pub fn add_language(&mut self, store: &mut TranslationStore, input: &str) -> Result<String, GridError> {
        let name = normalize_language_name(input)?;
        if !store.add_file(&name) {
            return Err(GridError::DuplicateLanguage(name));
        }
        log::debug!("add language {name}");
        self.sync(store);
        Ok(name)
    }

    /// Commit the typed header of column `col` as the file's new name.
    pub fn commit_header(&mut self, store: &mut TranslationStore, col: usize) -> Result<bool, GridError> {
        let Some(current) = store.file_names().nth(col).map(str::to_string) else {
            return Err(GridError::NoSuchColumn(col.to_string()));
        };
        let typed = self.header_buffers.get(col).cloned().unwrap_or_default();

        let renamed = normalize_language_name(&typed).and_then(|name| {
            if name != current && store.contains_file(&name) {
                Err(GridError::DuplicateLanguage(name))
            } else {
                Ok(name)
            }
        });
        let name = match renamed {
            Ok(name) => name,
            Err(e) => {
                self.set_header_buffer(col, current);
                return Err(e);
            }
        };

        let changed = name != current;
        if changed {
            log::debug!("rename language {current} -> {name}");
            store.rename_file(&current, &name);
        }
        self.set_header_buffer(col, name);
        Ok(changed)
    }

    /// Commit every key and header cell that still holds uncommitted text
    /// (a save can be triggered while a cell has focus).
    pub fn commit_pending(&mut self, store: &mut TranslationStore) -> Vec<GridError> {
        let mut errors = Vec::new();
        for row in 0..store.row_count() {
            let dirty = self
                .key_buffers
                .get(row)
                .is_some_and(|typed| Some(typed.trim()) != store.key_at(row).map(str::trim));
            if dirty && let Err(e) = self.commit_key(store, row) {
                errors.push(e);
            }
        }

        let names: Vec<String> = store.file_names().map(str::to_string).collect();
        for (col, name) in names.iter().enumerate() {
            let dirty = self.header_buffers.get(col).is_some_and(|typed| typed != name);
            if dirty && let Err(e) = self.commit_header(store, col) {
                errors.push(e);
            }
        }
        errors
    }

    fn set_key_buffer(&mut self, row: usize, text: String) {
        if let Some(buf) = self.key_buffers.get_mut(row) {
            *buf = text;
        }
    }

    fn set_header_buffer(&mut self, col: usize, text: String) {
        if let Some(buf) = self.header_buffers.get_mut(col) {
            *buf = text;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Grid, GridError, InsertSide, MoveDirection, normalize_language_name};
    use crate::keypath::FlatMap;
    use crate::store::TranslationStore;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn store() -> TranslationStore {
        let a: FlatMap = [("x.y".to_string(), json!("1"))].into_iter().collect();
        let b: FlatMap = [
            ("x.y".to_string(), json!("2")),
            ("z".to_string(), json!("3")),
        ]
        .into_iter()
        .collect();
        TranslationStore::from_files([("a.json".to_string(), a), ("b.json".to_string(), b)])
    }

    #[test]
    fn insert_side_uses_vertical_midpoint() {
        assert_eq!(InsertSide::from_pointer(10.0, 0.0, 30.0), InsertSide::Before);
        assert_eq!(InsertSide::from_pointer(15.0, 0.0, 30.0), InsertSide::After);
        assert_eq!(InsertSide::from_pointer(29.0, 0.0, 30.0), InsertSide::After);
    }

    #[test]
    fn new_row_fills_placeholder_once_key_is_typed() {
        let mut store = store();
        let mut grid = Grid::new(&store);

        let row = grid.insert_row(&mut store, 0, InsertSide::After).unwrap();
        assert_eq!(row, 1);
        assert_eq!(store.key_order(), ["x.y", "", "z"]);
        assert_eq!(
            grid.edit_cell(&mut store, row, "a.json", "nope"),
            Err(GridError::EmptyKey)
        );

        *grid.key_buffer_mut(row).unwrap() = "  greeting ".to_string();
        assert_eq!(grid.commit_key(&mut store, row), Ok(true));
        assert_eq!(store.key_order(), ["x.y", "greeting", "z"]);
        assert_eq!(grid.key_buffer(row), Some("greeting"));

        grid.edit_cell(&mut store, row, "a.json", "Hello").unwrap();
        assert_eq!(store.cell_text("a.json", "greeting"), "Hello");
    }

    #[test]
    fn insert_before_first_row_goes_to_the_top() {
        let mut store = store();
        let mut grid = Grid::new(&store);
        grid.select(0);

        assert_eq!(grid.insert_row(&mut store, 0, InsertSide::Before), Ok(0));
        assert_eq!(store.key_order(), ["", "x.y", "z"]);
        assert_eq!(grid.selected(), Some(1));
        assert_eq!(
            grid.insert_row(&mut store, 9, InsertSide::Before),
            Err(GridError::NoSuchRow(9))
        );
    }

    #[test]
    fn duplicate_and_empty_renames_are_rejected() {
        let mut store = store();
        let mut grid = Grid::new(&store);

        *grid.key_buffer_mut(1).unwrap() = "x.y".to_string();
        assert_eq!(
            grid.commit_key(&mut store, 1),
            Err(GridError::DuplicateKey("x.y".to_string()))
        );
        assert_eq!(grid.key_buffer(1), Some("z"));

        *grid.key_buffer_mut(1).unwrap() = "   ".to_string();
        assert_eq!(grid.commit_key(&mut store, 1), Err(GridError::EmptyKey));
        assert_eq!(store.key_order(), ["x.y", "z"]);
        assert_eq!(store.cell_text("b.json", "z"), "3");
    }

    #[test]
    fn clearing_a_cell_removes_the_value() {
        let mut store = store();
        let mut grid = Grid::new(&store);
        grid.edit_cell(&mut store, 1, "b.json", "").unwrap();
        assert!(store.value("b.json", "z").is_none());
        assert_eq!(store.key_order(), ["x.y", "z"]);
        assert_eq!(
            grid.edit_cell(&mut store, 1, "c.json", "x"),
            Err(GridError::NoSuchColumn("c.json".to_string()))
        );
    }

    #[test]
    fn delete_row_adjusts_selection() {
        let mut store = store();
        let mut grid = Grid::new(&store);
        grid.append_row(&mut store);
        grid.select(2);

        assert_eq!(grid.delete_row(&mut store, 0).as_deref(), Ok("x.y"));
        assert_eq!(store.key_order(), ["z", ""]);
        assert_eq!(grid.selected(), Some(1));
        assert!(store.value("a.json", "x.y").is_none());

        assert_eq!(grid.delete_row(&mut store, 1).as_deref(), Ok(""));
        assert_eq!(grid.selected(), None);
        assert_eq!(grid.key_buffer(0), Some("z"));
        assert_eq!(grid.key_buffer(1), None);
    }

    #[test]
    fn move_selected_stops_at_edges() {
        let mut store = store();
        let mut grid = Grid::new(&store);
        assert!(!grid.move_selected(&mut store, MoveDirection::Up));

        grid.select(0);
        assert!(!grid.move_selected(&mut store, MoveDirection::Up));
        assert!(grid.move_selected(&mut store, MoveDirection::Down));
        assert_eq!(store.key_order(), ["z", "x.y"]);
        assert_eq!(grid.key_buffer(0), Some("z"));
        assert_eq!(grid.selected(), Some(1));
        assert!(!grid.move_selected(&mut store, MoveDirection::Down));
    }

    #[test]
    fn add_language_normalizes_and_rejects_duplicates() {
        let mut store = store();
        let mut grid = Grid::new(&store);

        assert_eq!(grid.add_language(&mut store, " fr "), Ok("fr.json".to_string()));
        assert_eq!(
            grid.add_language(&mut store, "fr.json"),
            Err(GridError::DuplicateLanguage("fr.json".to_string()))
        );
        assert_eq!(store.file_count(), 3);
        assert_eq!(store.cell_text("fr.json", "x.y"), "");
    }

    #[test]
    fn normalize_language_name_rejects_paths() {
        assert!(normalize_language_name("").is_err());
        assert!(normalize_language_name(".json").is_err());
        assert!(normalize_language_name("../fr").is_err());
        assert!(normalize_language_name("a\\b.json").is_err());
        assert_eq!(normalize_language_name("pt-BR"), Ok("pt-BR.json".to_string()));
    }

    #[test]
    fn commit_header_renames_column() {
        let mut store = store();
        let mut grid = Grid::new(&store);

        *grid.header_buffer_mut(0).unwrap() = "en".to_string();
        assert_eq!(grid.commit_header(&mut store, 0), Ok(true));
        assert_eq!(store.file_names().collect::<Vec<_>>(), vec!["en.json", "b.json"]);
        assert_eq!(store.cell_text("en.json", "x.y"), "1");

        *grid.header_buffer_mut(0).unwrap() = "b.json".to_string();
        assert_eq!(
            grid.commit_header(&mut store, 0),
            Err(GridError::DuplicateLanguage("b.json".to_string()))
        );
        assert_eq!(grid.header_buffer(0), Some("en.json"));
    }

    #[test]
    fn commit_pending_flushes_typed_cells() {
        let mut store = store();
        let mut grid = Grid::new(&store);
        *grid.key_buffer_mut(1).unwrap() = "zz".to_string();
        *grid.header_buffer_mut(1).unwrap() = "de".to_string();
        grid.append_row(&mut store);
        *grid.key_buffer_mut(2).unwrap() = "x.y".to_string();

        let errors = grid.commit_pending(&mut store);
        assert_eq!(errors, vec![GridError::DuplicateKey("x.y".to_string())]);
        assert_eq!(store.key_order(), ["x.y", "zz", ""]);
        assert_eq!(store.cell_text("de.json", "zz"), "3");
    }

    #[test]
    fn padded_keys_are_left_alone_unless_edited() {
        let en: FlatMap = [
            ("a.b ".to_string(), json!("x")),
            (" c".to_string(), json!("y")),
        ]
        .into_iter()
        .collect();
        let mut store = TranslationStore::from_files([("en.json".to_string(), en)]);
        let mut grid = Grid::new(&store);

        assert_eq!(grid.commit_pending(&mut store), vec![]);
        assert_eq!(grid.commit_key(&mut store, 1), Ok(false));
        assert_eq!(store.key_order(), ["a.b ", " c"]);

        *grid.key_buffer_mut(1).unwrap() = " d ".to_string();
        assert_eq!(grid.commit_key(&mut store, 1), Ok(true));
        assert_eq!(store.key_order(), ["a.b ", "d"]);
        assert_eq!(store.cell_text("en.json", "d"), "y");
    }

    #[test]
    fn refresh_does_not_resurrect_deleted_keys() {
        let mut store = store();
        let mut grid = Grid::new(&store);
        grid.append_row(&mut store);
        store.remove_row(1);

        grid.refresh(&mut store);
        assert_eq!(store.key_order(), ["x.y", ""]);
        assert_eq!(grid.key_buffer(1), Some(""));
    }
}
