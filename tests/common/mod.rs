#![allow(dead_code)]

use patrolgrid::{parse_grid, PatrolEngine, PatrolOptions, PatrolReport};
use std::fs;
use std::path::{Path, PathBuf};

pub fn test_data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("test_data")
}

/// Files in `dir` with the given extension, sorted by name
pub fn fixture_files(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .map(|e| e.path())
                .filter(|p| p.extension().and_then(|s| s.to_str()) == Some(extension))
                .collect()
        })
        .unwrap_or_default();
    entries.sort();
    entries
}

/// Rotate one grid character a quarter turn clockwise
fn rotate_char(c: char) -> char {
    match c {
        '^' => '>',
        '>' => 'v',
        'v' => '<',
        '<' => '^',
        '|' => '-',
        '-' => '|',
        other => other,
    }
}

/// Rotate a text grid a quarter turn clockwise. Glyphs and axis marks rotate with it,
/// so a walk on the rotated grid is the rotated walk (turning right is preserved).
pub fn rotate_clockwise(text: &str) -> String {
    let rows: Vec<Vec<char>> = text
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| line.chars().collect())
        .collect();
    let height = rows.len();
    let width = rows.first().map(Vec::len).unwrap_or(0);

    let mut out = String::with_capacity(text.len());
    for col in 0..width {
        for row in (0..height).rev() {
            out.push(rotate_char(rows[row][col]));
        }
        out.push('\n');
    }
    out
}

/// The original grid followed by its three quarter-turn rotations
pub fn rotations(text: &str) -> Vec<(&'static str, String)> {
    let r90 = rotate_clockwise(text);
    let r180 = rotate_clockwise(&r90);
    let r270 = rotate_clockwise(&r180);
    vec![
        ("original", normalize(text)),
        ("rot90", r90),
        ("rot180", r180),
        ("rot270", r270),
    ]
}

/// Non-empty lines, each newline-terminated
pub fn normalize(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| format!("{}\n", line))
        .collect()
}

/// Parse a standard format test file
/// Format:
/// - first block: the layout, with the actor glyph
/// - blank line
/// - second block: the expected grid once the actor has left, with visitation marks
pub fn parse_standard_test(path: &Path) -> Result<(String, String), Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)?;
    let blocks: Vec<String> = contents
        .replace("\r\n", "\n")
        .split("\n\n")
        .map(normalize)
        .filter(|block| !block.is_empty())
        .collect();

    if blocks.len() != 2 {
        return Err(format!("expected 2 blocks, found {}", blocks.len()).into());
    }

    Ok((blocks[0].clone(), blocks[1].clone()))
}

/// Run a marked walk; returns the rendered trace and the report
pub fn run_trace(text: &str) -> (String, PatrolReport) {
    let (mut grid, actor) = parse_grid(text).expect("fixture grid should parse");
    let report = PatrolEngine::new(actor, PatrolOptions::tracing())
        .run(&mut grid)
        .expect("fixture walk should leave the grid");
    (grid.to_string(), report)
}

/// Count visitation marks in a rendered grid
pub fn count_marks(text: &str) -> usize {
    text.chars().filter(|c| matches!(c, '|' | '-' | '+')).count()
}
