use thiserror::Error;

#[derive(Error, Debug)]
pub enum PatrolError {
    #[error("Malformed grid: {0}")]
    MalformedGrid(String),

    #[error("No actor glyph (^ > v <) found in grid")]
    MissingActor,

    #[error("More than one actor glyph in grid (cells {first} and {second})")]
    MultipleActors { first: usize, second: usize },

    #[error("Invalid actor glyph: {0:?}")]
    InvalidGlyph(char),

    #[error("Unknown grid symbol {symbol:?} at row {row}, col {col}")]
    UnknownSymbol { symbol: char, row: usize, col: usize },

    #[error("Cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Actor never left the grid after {steps} steps")]
    NoExit { steps: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, PatrolError>;
