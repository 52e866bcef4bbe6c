//! Desktop GUI
//!
//! The main window plus three dialogs:
//! - **Preferences**: where `cocos` and `sdkbox` live (auto-detected, editable)
//! - **Progress**: live output of a running tool
//! - **About**: version and license
//!
//! Dialog behavior lives in plain view-model structs; the render functions
//! only translate clicks and edits into calls on them.

pub mod about;
pub mod app;
mod helpers;
pub mod preferences;
pub mod progress;
pub mod runner;
pub mod theme;

pub use app::ConsoleApp;
pub use preferences::{PreferencesAction, PreferencesState};
pub use progress::{ProgressDialog, RunStatus};
pub use runner::run_gui;
