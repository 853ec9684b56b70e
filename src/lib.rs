//! Core library for Locale Grid.
//! Loads a folder of JSON locale files into flat dotted-key rows, lets the grid
//! controller edit them, and writes them back as nested JSON.

pub mod bridge;
pub mod grid;
mod gui;
pub mod keypath;
pub mod statics;
pub mod store;

pub use bridge::{BridgeError, LocaleDir};
pub use grid::{Grid, GridError, InsertSide, MoveDirection};
pub use gui::run_gui;
pub use keypath::{FlatMap, flatten, unflatten};
pub use store::{SaveError, TranslationStore};
