use crate::actor::{Actor, Direction};
use crate::error::{PatrolError, Result};
use crate::grid::{Grid, Symbol};

/// Parse a text grid into the grid store and the starting actor.
///
/// Format:
/// - `.`: empty cell
/// - `#`: obstacle
/// - `|`, `-`, `+`: visitation marks (as rendered by `Grid`'s `Display`)
/// - `^`, `>`, `v`, `<`: the actor and its initial direction, exactly once
///
/// The column count is taken from the first line and every following row must match.
/// Trailing blank lines are ignored. The actor's cell is stored as empty.
pub fn parse_grid(text: &str) -> Result<(Grid, Actor)> {
    let mut lines: Vec<&str> = text.lines().map(|line| line.trim_end_matches('\r')).collect();
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }

    if lines.is_empty() {
        return Err(PatrolError::MalformedGrid("no grid lines found".to_string()));
    }

    let mut rows = Vec::with_capacity(lines.len());
    let mut actor: Option<Actor> = None;
    let cols = lines[0].chars().count();

    for (row, line) in lines.iter().enumerate() {
        let mut symbols = Vec::with_capacity(cols);
        for (col, ch) in line.chars().enumerate() {
            if Direction::from_glyph(ch).is_some() {
                let id = row * cols + col;
                if let Some(first) = actor {
                    return Err(PatrolError::MultipleActors {
                        first: first.position(),
                        second: id,
                    });
                }
                actor = Some(Actor::from_glyph(id, ch)?);
                symbols.push(Symbol::Empty);
                continue;
            }

            let symbol = Symbol::from_char(ch).ok_or(PatrolError::UnknownSymbol {
                symbol: ch,
                row,
                col,
            })?;
            symbols.push(symbol);
        }
        rows.push(symbols);
    }

    let grid = Grid::from_rows(rows)?;
    let actor = actor.ok_or(PatrolError::MissingActor)?;

    Ok((grid, actor))
}

/// Render the grid with the actor drawn on top, the inverse of `parse_grid`
pub fn render_with_actor(grid: &Grid, actor: &Actor) -> String {
    let mut text = String::with_capacity(grid.cell_count() + grid.rows);
    for (id, symbol) in grid.cells().iter().enumerate() {
        if id == actor.position() {
            text.push(actor.direction().glyph());
        } else {
            text.push(symbol.to_char());
        }
        if (id + 1) % grid.cols == 0 {
            text.push('\n');
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_small_grid() {
        let (grid, actor) = parse_grid("..#\n.^.\n...\n").unwrap();
        assert_eq!(grid.dimensions(), (3, 3));
        assert_eq!(actor.position(), 4);
        assert_eq!(actor.direction(), Direction::Up);
        assert_eq!(grid.cell_at(1, 1).unwrap(), Symbol::Empty);
        assert!(grid.is_obstacle(0, 2));
    }

    #[test]
    fn test_parse_handles_crlf_and_trailing_blank_lines() {
        let (grid, actor) = parse_grid("..\r\n>.\r\n\r\n\n").unwrap();
        assert_eq!(grid.dimensions(), (2, 2));
        assert_eq!(actor.position(), 2);
        assert_eq!(actor.direction(), Direction::Right);
    }

    #[test]
    fn test_parse_rejects_ragged_rows() {
        assert!(matches!(parse_grid("...\n.^\n..."), Err(PatrolError::MalformedGrid(_))));
    }

    #[test]
    fn test_parse_rejects_empty_input() {
        assert!(matches!(parse_grid(""), Err(PatrolError::MalformedGrid(_))));
        assert!(matches!(parse_grid("\n\n"), Err(PatrolError::MalformedGrid(_))));
    }

    #[test]
    fn test_parse_missing_actor() {
        assert!(matches!(parse_grid("...\n.#.\n"), Err(PatrolError::MissingActor)));
    }

    #[test]
    fn test_parse_multiple_actors() {
        assert!(matches!(
            parse_grid("^..\n..<\n"),
            Err(PatrolError::MultipleActors { first: 0, second: 5 })
        ));
    }

    #[test]
    fn test_parse_unknown_symbol() {
        assert!(matches!(
            parse_grid("..x\n.^.\n"),
            Err(PatrolError::UnknownSymbol { symbol: 'x', row: 0, col: 2 })
        ));
    }

    #[test]
    fn test_render_with_actor_roundtrip() {
        let text = "....#\n.|.v.\n#-+..\n";
        let (grid, actor) = parse_grid(text).unwrap();
        assert_eq!(render_with_actor(&grid, &actor), text);
    }
}
