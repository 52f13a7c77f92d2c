use thiserror::Error;

use crate::{pos, Pos, World};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    #[error("unexpected character {found:?} at line {line}, column {column}")]
    UnexpectedChar {
        found: char,
        line: usize,
        column: usize,
    },
}

/// Parses a plaintext pattern: `#` marks an alive cell, `.` and space mark
/// dead ones, lines starting with `!` are comments. The text's top-left
/// corner is cell (0, 0).
pub fn parse(text: &str) -> Result<Vec<Pos>, PatternError> {
    let mut actives = vec![];
    for (y, line) in text.lines().enumerate() {
        if line.starts_with('!') {
            continue;
        }
        for (x, char) in line.chars().enumerate() {
            match char {
                '#' => actives.push(pos!(x as i32, y as i32)),
                '.' | ' ' | '\r' => (),
                found => {
                    return Err(PatternError::UnexpectedChar {
                        found,
                        line: y + 1,
                        column: x + 1,
                    })
                }
            }
        }
    }
    Ok(actives)
}

/// Renders the alive cells as pattern text covering their bounding box.
/// An empty world renders as an empty string.
pub fn render<W>(world: &W) -> String
where
    W: World,
{
    let actives = world.actives();
    let Some(first) = actives.first() else {
        return String::new();
    };

    let mut min = *first;
    let mut max = *first;
    for pos in &actives {
        min = pos!(min.x.min(pos.x), min.y.min(pos.y));
        max = pos!(max.x.max(pos.x), max.y.max(pos.y));
    }

    let mut result = String::new();
    for y in min.y..=max.y {
        for x in min.x..=max.x {
            let char = if world.is_alive(pos!(x, y)) { '#' } else { '.' };
            result.push(char);
        }
        result.push('\n');
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SparseWorld;

    #[test]
    fn parse_reads_row_major_cells() {
        let actives = parse(".#.\n..#\n###\n").unwrap();
        assert_eq!(
            actives,
            vec![pos!(1, 0), pos!(2, 1), pos!(0, 2), pos!(1, 2), pos!(2, 2)]
        );
    }

    #[test]
    fn parse_skips_comment_lines() {
        // comment lines still count as rows, keeping cell offsets intact
        let actives = parse("! glider\n.#.\n").unwrap();
        assert_eq!(actives, vec![pos!(1, 1)]);
    }

    #[test]
    fn parse_rejects_unknown_characters_with_a_position() {
        let error = parse("..\n.x\n").unwrap_err();
        assert_eq!(
            error,
            PatternError::UnexpectedChar {
                found: 'x',
                line: 2,
                column: 2,
            }
        );
    }

    #[test]
    fn parse_of_empty_text_is_empty() {
        assert_eq!(parse("").unwrap(), vec![]);
    }

    #[test]
    fn render_covers_the_bounding_box() {
        let world: SparseWorld = [pos!(-1, -1), pos!(1, 0)].into_iter().collect();
        assert_eq!(render(&world), "#..\n..#\n");
    }

    #[test]
    fn render_of_an_empty_world_is_empty() {
        assert_eq!(render(&SparseWorld::default()), "");
    }
}
