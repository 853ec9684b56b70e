use crate::bridge::{BridgeError, LocaleDir};
use crate::keypath::{self, FlatMap};
use crate::statics;
use anyhow::Context;
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

/// How a file's text looked on disk, so a save does not churn line endings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextFormat {
    pub line_ending: LineEnding,
    pub trailing_newline: bool,
}

impl TextFormat {
    pub fn detect(text: &str) -> Self {
        Self {
            line_ending: detect_line_ending(text),
            trailing_newline: text.ends_with('\n'),
        }
    }

    /// Re-apply this format to LF-only serializer output.
    pub fn apply(&self, mut text: String) -> String {
        let newline = match self.line_ending {
            LineEnding::Lf => statics::NL_LF,
            LineEnding::CrLf => statics::NL_CRLF,
        };
        if self.line_ending == LineEnding::CrLf {
            text = text.replace(statics::NL_LF, newline);
        }
        if self.trailing_newline {
            text.push_str(newline);
        }
        text
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub name: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSummary {
    pub written: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("no folder is open")]
    NoFolder,
    #[error("serializing {name}")]
    Serialize {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{} file(s) failed to save, {} written: {}", .failed.len(), .written.len(), describe_failures(.failed))]
    Write {
        written: Vec<String>,
        failed: Vec<BridgeError>,
    },
}

fn describe_failures(failed: &[BridgeError]) -> String {
    failed
        .iter()
        .map(|e| match std::error::Error::source(e) {
            Some(source) => format!("{e}: {source}"),
            None => e.to_string(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// All loaded locale files plus the row order shared between them.
///
/// Files are kept in load order (one grid column each). `key_order` holds one entry
/// per grid row; an empty string is a row whose key has not been typed yet.
#[derive(Debug, Clone, Default)]
pub struct TranslationStore {
    dir: Option<LocaleDir>,
    files: IndexMap<String, FlatMap>,
    formats: IndexMap<String, TextFormat>,
    key_order: Vec<String>,
    pub skipped: Vec<SkippedFile>,
}

impl TranslationStore {
    /// Load every `.json` file in `dir`. Files that cannot be read or are not a JSON
    /// object are skipped (and logged) without aborting the rest.
    pub fn load(dir: LocaleDir) -> Result<Self, BridgeError> {
        let mut store = Self::default();

        for name in dir.json_entries()? {
            let parsed = dir
                .read_text(&name)
                .map_err(anyhow::Error::from)
                .and_then(|text| parse_locale_file(&text).map(|flat| (flat, text)));

            match parsed {
                Ok((flat, text)) => {
                    log::debug!("loaded {name}: {} keys", flat.len());
                    store.formats.insert(name.clone(), TextFormat::detect(&text));
                    store.files.insert(name, flat);
                }
                Err(e) => {
                    log::error!("Invalid JSON: {name}: {e:#}");
                    store.skipped.push(SkippedFile {
                        name,
                        reason: format!("{e:#}"),
                    });
                }
            }
        }

        store.reconcile_key_order();
        log::info!(
            "loaded {} files ({} skipped), {} keys from {:?}",
            store.files.len(),
            store.skipped.len(),
            store.key_order.len(),
            dir.path()
        );
        store.dir = Some(dir);
        Ok(store)
    }

    /// An in-memory store with no backing folder.
    pub fn from_files<I>(files: I) -> Self
    where
        I: IntoIterator<Item = (String, FlatMap)>,
    {
        let mut store = Self {
            files: files.into_iter().collect(),
            ..Self::default()
        };
        store.reconcile_key_order();
        store
    }

    pub fn dir(&self) -> Option<&LocaleDir> {
        self.dir.as_ref()
    }

    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn file(&self, name: &str) -> Option<&FlatMap> {
        self.files.get(name)
    }

    pub fn contains_file(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    pub fn key_order(&self) -> &[String] {
        &self.key_order
    }

    pub fn row_count(&self) -> usize {
        self.key_order.len()
    }

    pub fn key_at(&self, row: usize) -> Option<&str> {
        self.key_order.get(row).map(String::as_str)
    }

    /// Row index of `key`, ignoring `except` (the row being renamed).
    pub fn find_key(&self, key: &str, except: Option<usize>) -> Option<usize> {
        self.key_order
            .iter()
            .enumerate()
            .find(|(i, k)| Some(*i) != except && k.as_str() == key)
            .map(|(i, _)| i)
    }

    pub fn value(&self, file: &str, key: &str) -> Option<&Value> {
        self.files.get(file)?.get(key)
    }

    /// Text shown in the grid: strings verbatim, other leaves as compact JSON,
    /// absent values and null as blank.
    pub fn cell_text(&self, file: &str, key: &str) -> String {
        match self.value(file, key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Append every key that appears in a file but not yet in the row order.
    /// Existing rows keep their position; new keys follow file order, then key order.
    pub fn reconcile_key_order(&mut self) {
        let mut seen: HashSet<String> = self.key_order.iter().cloned().collect();
        for flat in self.files.values() {
            for key in flat.keys() {
                if seen.insert(key.clone()) {
                    self.key_order.push(key.clone());
                }
            }
        }
    }

    /// Set one cell. Empty text clears the value for that file.
    /// Returns false when the file or key does not exist.
    pub fn set_cell(&mut self, file: &str, key: &str, text: &str) -> bool {
        if key.is_empty() {
            return false;
        }
        let Some(flat) = self.files.get_mut(file) else {
            return false;
        };
        if text.is_empty() {
            flat.shift_remove(key);
        } else {
            flat.insert(key.to_string(), Value::String(text.to_string()));
        }
        true
    }

    /// Replace the key of `row` in place, moving every file's value along with it.
    /// Callers make sure `new_key` is not used by another row.
    pub fn rename_key(&mut self, row: usize, new_key: &str) -> bool {
        let Some(slot) = self.key_order.get_mut(row) else {
            return false;
        };
        let old_key = std::mem::replace(slot, new_key.to_string());
        if old_key.is_empty() {
            return true;
        }

        for flat in self.files.values_mut() {
            let Some(idx) = flat.get_index_of(&old_key) else {
                continue;
            };
            if let Some((_, value)) = flat.shift_remove_index(idx) {
                flat.shift_insert(idx, new_key.to_string(), value);
            }
        }
        true
    }

    /// Insert a row at `row` (clamped to the end) with the given key.
    pub fn insert_key(&mut self, row: usize, key: &str) -> usize {
        let row = row.min(self.key_order.len());
        self.key_order.insert(row, key.to_string());
        row
    }

    /// Remove `row`. A non-blank key is also dropped from every file and from any
    /// other row carrying it, so a later refresh cannot bring it back.
    pub fn remove_row(&mut self, row: usize) -> Option<String> {
        if row >= self.key_order.len() {
            return None;
        }
        let key = self.key_order.remove(row);
        if !key.is_empty() {
            for flat in self.files.values_mut() {
                flat.shift_remove(&key);
            }
            self.key_order.retain(|k| k != &key);
        }
        Some(key)
    }

    pub fn swap_rows(&mut self, a: usize, b: usize) -> bool {
        if a >= self.key_order.len() || b >= self.key_order.len() {
            return false;
        }
        self.key_order.swap(a, b);
        true
    }

    /// Add an empty file (a new grid column). Returns false if it already exists.
    pub fn add_file(&mut self, name: &str) -> bool {
        if self.files.contains_key(name) {
            return false;
        }
        self.files.insert(name.to_string(), FlatMap::new());
        true
    }

    /// Rename a file entry in place (same column position).
    pub fn rename_file(&mut self, old: &str, new: &str) -> bool {
        if old == new {
            return true;
        }
        if self.files.contains_key(new) {
            return false;
        }
        let Some(idx) = self.files.get_index_of(old) else {
            return false;
        };
        let Some((_, flat)) = self.files.shift_remove_index(idx) else {
            return false;
        };
        self.files.shift_insert(idx, new.to_string(), flat);
        if let Some(format) = self.formats.shift_remove(old) {
            self.formats.insert(new.to_string(), format);
        }
        true
    }

    /// Serialize every file in row order without touching the disk.
    /// Blank and repeated row keys are skipped, absent values are omitted and
    /// string values are trimmed.
    pub fn render_files(&self) -> Result<Vec<RenderedFile>, SaveError> {
        // Values stay under the key they were loaded with; padding only matters
        // for spotting blank rows.
        let mut seen = HashSet::new();
        let keys: Vec<&str> = self
            .key_order
            .iter()
            .map(String::as_str)
            .filter(|k| !k.trim().is_empty() && seen.insert(*k))
            .collect();

        let mut out = Vec::with_capacity(self.files.len());
        for (name, flat) in &self.files {
            let mut ordered = FlatMap::new();
            for key in &keys {
                if let Some(value) = flat.get(*key) {
                    ordered.insert((*key).to_string(), trim_value(value));
                }
            }

            let nested = Value::Object(keypath::unflatten(&ordered));
            let json =
                serde_json::to_string_pretty(&nested).map_err(|source| SaveError::Serialize {
                    name: name.clone(),
                    source,
                })?;
            let format = self.formats.get(name).copied().unwrap_or_default();
            out.push(RenderedFile {
                name: name.clone(),
                text: format.apply(json),
            });
        }
        Ok(out)
    }

    /// Write every file back to the source folder (full overwrite).
    ///
    /// All files are serialized before the first write. Every write is attempted;
    /// failures are reported together and files already written stay written.
    pub fn save(&self) -> Result<SaveSummary, SaveError> {
        let dir = self.dir.as_ref().ok_or(SaveError::NoFolder)?;
        let rendered = self.render_files()?;

        let mut written = Vec::new();
        let mut failed = Vec::new();
        for file in rendered {
            match dir.write_text(&file.name, &file.text) {
                Ok(()) => {
                    log::debug!("wrote {}", file.name);
                    written.push(file.name);
                }
                Err(e) => {
                    log::error!("{}", describe_failures(std::slice::from_ref(&e)));
                    failed.push(e);
                }
            }
        }

        if !failed.is_empty() {
            return Err(SaveError::Write { written, failed });
        }
        log::info!("saved {} files to {:?}", written.len(), dir.path());
        Ok(SaveSummary { written })
    }
}

/// Parse one locale file into its flat mapping.
pub fn parse_locale_file(text: &str) -> anyhow::Result<FlatMap> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let root: Value = serde_json::from_str(text).context("parsing JSON")?;
    keypath::flatten_value(&root)
        .with_context(|| format!("top level is {}, expected an object", type_name(&root)))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn trim_value(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.trim().to_string()),
        other => other.clone(),
    }
}

fn detect_line_ending(text: &str) -> LineEnding {
    let crlf = text.matches("\r\n").count();
    let bare_lf = text.matches('\n').count() - crlf;
    if crlf > bare_lf {
        LineEnding::CrLf
    } else {
        LineEnding::Lf
    }
}
