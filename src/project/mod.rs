//! Project metadata loaded from a cocos project file

use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Change notifications emitted by [`GameState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStateEvent {
    PropertiesUpdated,
    LibrariesUpdated,
}

/// A game project: its file, its properties and the libraries it uses
#[derive(Debug)]
pub struct GameState {
    file_path: PathBuf,
    path: PathBuf,
    project_name: String,
    game_properties: Map<String, Value>,
    game_libraries: Map<String, Value>,
    properties_parsed: bool,
    libraries_parsed: bool,
    subscribers: Vec<Sender<GameStateEvent>>,
}

impl GameState {
    /// State for `file_path`; nothing is read yet
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        let file_path = file_path.into();
        let path = file_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let project_name = file_path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|s| s.trim_start_matches('.').to_string())
            .unwrap_or_default();

        Self {
            file_path,
            path,
            project_name,
            game_properties: Map::new(),
            game_libraries: Map::new(),
            properties_parsed: false,
            libraries_parsed: false,
            subscribers: Vec::new(),
        }
    }

    /// Read a project file and parse its content as the game properties
    pub fn open(file_path: impl Into<PathBuf>) -> Result<Self> {
        let mut state = Self::new(file_path);
        let content = std::fs::read_to_string(&state.file_path)
            .with_context(|| format!("Failed to read project file: {}", state.file_path.display()))?;
        if !state.parse_game_properties(&content) {
            anyhow::bail!(
                "Project file is not a JSON object: {}",
                state.file_path.display()
            );
        }
        Ok(state)
    }

    /// Directory containing the project file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn game_properties(&self) -> &Map<String, Value> {
        &self.game_properties
    }

    pub fn game_libraries(&self) -> &Map<String, Value> {
        &self.game_libraries
    }

    /// Both properties and libraries have been parsed
    pub fn is_ready(&self) -> bool {
        self.properties_parsed && self.libraries_parsed
    }

    pub fn properties_parsed(&self) -> bool {
        self.properties_parsed
    }

    pub fn libraries_parsed(&self) -> bool {
        self.libraries_parsed
    }

    /// Replace the properties with `json`. Returns false, keeping the old
    /// value, if `json` is not a JSON object.
    pub fn parse_game_properties(&mut self, json: &str) -> bool {
        let Some(object) = parse_object(json, "game properties") else {
            return false;
        };
        self.game_properties = object;
        self.properties_parsed = true;
        self.emit(GameStateEvent::PropertiesUpdated);
        true
    }

    /// Replace the libraries with `json`. Same rules as the properties.
    pub fn parse_game_libraries(&mut self, json: &str) -> bool {
        let Some(object) = parse_object(json, "game libraries") else {
            return false;
        };
        self.game_libraries = object;
        self.libraries_parsed = true;
        self.emit(GameStateEvent::LibrariesUpdated);
        true
    }

    /// Receive change notifications
    pub fn subscribe(&mut self) -> Receiver<GameStateEvent> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    fn emit(&mut self, event: GameStateEvent) {
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }
}

fn parse_object(json: &str, what: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(json) {
        Ok(Value::Object(object)) => {
            debug!("[cocos-gui] Parsed {} ({} keys)", what, object.len());
            Some(object)
        }
        Ok(_) => {
            warn!("[cocos-gui] Ignoring {}: not a JSON object", what);
            None
        }
        Err(e) => {
            warn!("[cocos-gui] Failed to parse {}: {}", what, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_new_derives_path_and_name() {
        let state = GameState::new("/work/MyGame/MyGame.cocos-project.json");
        assert_eq!(state.path(), Path::new("/work/MyGame"));
        assert_eq!(state.project_name(), "MyGame.cocos-project");
        assert!(!state.is_ready());
    }

    #[test]
    fn test_hidden_project_file_name() {
        let state = GameState::new("/work/MyGame/.cocos-project.json");
        assert_eq!(state.project_name(), "cocos-project");
    }

    #[test]
    fn test_ready_after_both_parsed() {
        let mut state = GameState::new("/work/game.json");
        assert!(state.parse_game_properties(r#"{"project_type": "cpp"}"#));
        assert!(!state.is_ready());
        assert!(state.parse_game_libraries(r#"{"sdkbox": {"plugins": []}}"#));
        assert!(state.is_ready());
        assert_eq!(state.game_properties()["project_type"], "cpp");
    }

    #[test]
    fn test_invalid_json_keeps_previous_value() {
        let mut state = GameState::new("/work/game.json");
        assert!(state.parse_game_libraries(r#"{"iap": true}"#));
        assert!(!state.parse_game_libraries("[1, 2, 3]"));
        assert!(!state.parse_game_libraries("{not json"));
        assert_eq!(state.game_libraries()["iap"], true);
        assert!(state.libraries_parsed());
    }

    #[test]
    fn test_subscribers_are_notified() {
        let mut state = GameState::new("/work/game.json");
        let rx = state.subscribe();

        state.parse_game_properties("{}");
        state.parse_game_properties("oops");
        state.parse_game_libraries("{}");

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![GameStateEvent::PropertiesUpdated, GameStateEvent::LibrariesUpdated]
        );
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let mut state = GameState::new("/work/game.json");
        drop(state.subscribe());
        state.parse_game_properties("{}");
        assert!(state.subscribers.is_empty());
    }

    #[test]
    fn test_open_reads_properties() {
        let dir = tempdir().unwrap();
        let file = dir.path().join(".cocos-project.json");
        std::fs::write(&file, r#"{"engine_version": "cocos2d-x-3.8", "project_type": "lua"}"#)
            .unwrap();

        let state = GameState::open(&file).unwrap();
        assert!(state.properties_parsed());
        assert_eq!(state.game_properties()["engine_version"], "cocos2d-x-3.8");
        assert_eq!(state.path(), dir.path());
    }

    #[test]
    fn test_open_rejects_non_object() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("broken.json");
        std::fs::write(&file, "42").unwrap();
        assert!(GameState::open(&file).is_err());
        assert!(GameState::open(dir.path().join("missing.json")).is_err());
    }
}
