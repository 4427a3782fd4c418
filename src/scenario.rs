use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::actor::Actor;
use crate::error::Result;
use crate::grid::Grid;
use crate::parse::{parse_grid, render_with_actor};

/// A named grid layout with the answers it is expected to produce
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub name: String,
    /// Grid rows including the actor glyph
    pub grid: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_visited: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_loop_placements: Option<usize>,
}

impl Scenario {
    /// Capture the current layout; visitation marks are dropped
    pub fn from_grid(name: &str, grid: &Grid, actor: &Actor) -> Self {
        let mut clean = grid.clone();
        clean.clear_marks();
        let grid = render_with_actor(&clean, actor)
            .lines()
            .map(str::to_string)
            .collect();

        Scenario {
            name: name.to_string(),
            grid,
            expected_visited: None,
            expected_loop_placements: None,
        }
    }

    pub fn text(&self) -> String {
        let mut text = self.grid.join("\n");
        text.push('\n');
        text
    }

    pub fn parse(&self) -> Result<(Grid, Actor)> {
        parse_grid(&self.text())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let scenario = serde_json::from_str(&json)?;
        Ok(scenario)
    }
}

/// Load a grid file: `.json` files are scenarios, anything else is a text layout
pub fn load_layout<P: AsRef<Path>>(path: P) -> Result<(Grid, Actor)> {
    let path = path.as_ref();
    if path.extension().and_then(|s| s.to_str()) == Some("json") {
        Scenario::load_from_file(path)?.parse()
    } else {
        parse_grid(&fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patrol::{PatrolEngine, PatrolOptions};

    #[test]
    fn test_from_grid_drops_marks() {
        let (mut grid, actor) = parse_grid("..#.\n.^..\n").unwrap();
        PatrolEngine::new(actor, PatrolOptions::tracing())
            .run(&mut grid)
            .unwrap();
        assert!(grid.visited_count() > 0);

        let scenario = Scenario::from_grid("small", &grid, &actor);
        assert_eq!(scenario.grid, vec!["..#.".to_string(), ".^..".to_string()]);
        assert_eq!(scenario.text(), "..#.\n.^..\n");
    }

    #[test]
    fn test_json_field_names() {
        let json = r#"{"name":"t","grid":["^."],"expectedVisited":1}"#;
        let scenario: Scenario = serde_json::from_str(json).unwrap();
        assert_eq!(scenario.expected_visited, Some(1));
        assert_eq!(scenario.expected_loop_placements, None);

        let (grid, actor) = scenario.parse().unwrap();
        assert_eq!(grid.dimensions(), (1, 2));
        assert_eq!(actor.position(), 0);
    }

    #[test]
    fn test_load_layout_from_configured_default() {
        let config = crate::config::Config::default();
        let (grid, actor) = load_layout(&config.default_grid_file.path).unwrap();
        assert_eq!(grid.dimensions(), (10, 10));
        assert_eq!(actor.position(), 64);
        assert_eq!(grid.visited_count(), 0);
    }

    #[test]
    fn test_load_layout_text_file() {
        let path = std::env::temp_dir().join(format!("patrolgrid_layout_{}.txt", std::process::id()));
        fs::write(&path, "..#\n.^.\n").unwrap();
        let loaded = load_layout(&path);
        let _ = fs::remove_file(&path);

        let (grid, actor) = loaded.unwrap();
        assert_eq!(grid.dimensions(), (2, 3));
        assert_eq!(actor.position(), 4);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("patrolgrid_scenario_{}.json", std::process::id()));
        let scenario = Scenario {
            name: "roundtrip".to_string(),
            grid: vec![".#".to_string(), ">.".to_string()],
            expected_visited: Some(2),
            expected_loop_placements: Some(0),
        };

        scenario.save_to_file(&path).unwrap();
        let loaded = Scenario::load_from_file(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, scenario);
    }
}
