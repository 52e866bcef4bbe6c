//! Cocos2d Console GUI
//!
//! A desktop front-end for the cocos2d-x console (`cocos`) and the SDKBOX
//! installer (`sdkbox`). It finds where the tools are installed, lets the user
//! confirm or override those locations, and runs the tools while streaming
//! their output into a progress window.
//!
//! ## Finding the tools
//!
//! Each tool is looked up through a fixed fallback chain (stored setting,
//! login-shell PATH, working directory, well-known checkouts, Applications
//! directory). See [`resolver`] for the details. A tool that cannot be found
//! is not an error: its path is simply empty until the user picks one.

pub mod gui;
pub mod project;
pub mod resolver;
pub mod runner;
pub mod settings;
pub mod tool;

pub use resolver::{PathResolver, ResolveSource, ToolPathEntry};
pub use settings::{FileSettings, MemorySettings, SettingsStore, SharedSettings};
pub use tool::Tool;
