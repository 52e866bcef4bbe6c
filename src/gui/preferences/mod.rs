//! Preferences dialog
//!
//! Shows where `cocos` and `sdkbox` live, lets the user browse for other
//! directories and saves the result to the settings store.

mod panel;
mod state;

pub use panel::{render_preferences, PreferencesAction};
pub use state::{PreferencesState, ToolField};
