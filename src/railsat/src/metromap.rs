//! Formats decoded paths as `.metromap` text.

use crate::direction::Direction;
use std::io::{self, Write};

/// Write the `.metromap` text for a decoded result.
///
/// UNSAT is a single line `0`. Otherwise one line per metro line, in encoder order: its direction
/// letters followed by a trailing `0`, all space-separated.
pub fn write_metromap<W: Write>(w: &mut W, paths: Option<&[Vec<Direction>]>) -> io::Result<()> {
    match paths {
        None => writeln!(w, "0"),
        Some(paths) => {
            for path in paths {
                for d in path {
                    write!(w, "{} ", d.letter())?;
                }
                writeln!(w, "0")?;
            }
            Ok(())
        }
    }
}

/// Render the `.metromap` text to a `String`, for callers that don't want to deal with `io::Write`.
pub fn format_metromap(paths: Option<&[Vec<Direction>]>) -> String {
    let mut buf = Vec::new();
    write_metromap(&mut buf, paths).expect("writing to a Vec<u8> cannot fail");
    String::from_utf8(buf).expect("direction letters and digits are always valid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsat_is_a_single_zero_line() {
        assert_eq!(format_metromap(None), "0\n");
    }

    #[test]
    fn renders_one_line_per_path() {
        let paths = vec![vec![Direction::R, Direction::R, Direction::D], vec![Direction::U]];
        let text = format_metromap(Some(&paths));
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), "R R D 0");
        assert_eq!(lines.next().unwrap(), "U 0");
        assert!(lines.next().is_none());
    }

    #[test]
    fn empty_path_is_just_the_terminator() {
        let paths = vec![vec![]];
        assert_eq!(format_metromap(Some(&paths)), "0\n");
    }
}
