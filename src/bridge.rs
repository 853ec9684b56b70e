use std::{
    fs,
    path::{Path, PathBuf},
};

/// File suffix of managed locale files.
pub const JSON_SUFFIX: &str = ".json";

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("{0:?} is not a directory")]
    NotADirectory(PathBuf),
    #[error("{0:?} is read-only; write access is required")]
    ReadOnly(PathBuf),
    #[error("listing {path:?}")]
    List {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("reading {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("writing {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A folder of locale files the editor may read from and write to.
/// Access is checked once in [`LocaleDir::open`]; the handle is dropped when another
/// folder is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleDir {
    path: PathBuf,
}

impl LocaleDir {
    pub fn open(path: &Path) -> Result<Self, BridgeError> {
        let meta = fs::metadata(path).map_err(|_| BridgeError::NotADirectory(path.to_path_buf()))?;
        if !meta.is_dir() {
            return Err(BridgeError::NotADirectory(path.to_path_buf()));
        }
        if meta.permissions().readonly() {
            return Err(BridgeError::ReadOnly(path.to_path_buf()));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Display name of the folder (last path component).
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Names of the regular `.json` files directly inside the folder, sorted.
    pub fn json_entries(&self) -> Result<Vec<String>, BridgeError> {
        let list_err = |source| BridgeError::List {
            path: self.path.clone(),
            source,
        };

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.path).map_err(list_err)? {
            let entry = entry.map_err(list_err)?;
            let Ok(kind) = entry.file_type() else {
                continue;
            };
            if !kind.is_file() {
                continue;
            }
            // Names that are not valid UTF-8 cannot round-trip through the grid header.
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if name.ends_with(JSON_SUFFIX) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn read_text(&self, name: &str) -> Result<String, BridgeError> {
        let path = self.path.join(name);
        fs::read_to_string(&path).map_err(|source| BridgeError::Read { path, source })
    }

    /// Create or fully overwrite `name` with `text`.
    pub fn write_text(&self, name: &str, text: &str) -> Result<(), BridgeError> {
        let path = self.path.join(name);
        fs::write(&path, text.as_bytes()).map_err(|source| BridgeError::Write { path, source })
    }
}
