pub mod actor;
pub mod analysis;
pub mod config;
pub mod error;
pub mod grid;
pub mod parse;
pub mod patrol;
pub mod scenario;
pub mod solver;

pub use actor::{Actor, Direction};
pub use analysis::PathAnalyzer;
pub use config::Config;
pub use error::{PatrolError, Result};
pub use grid::{Grid, Symbol};
pub use parse::parse_grid;
pub use patrol::{PatrolEngine, PatrolOptions, PatrolReport, PatrolState};
pub use scenario::{load_layout, Scenario};
pub use solver::{solve, solve_file, solve_layout, Variant};
