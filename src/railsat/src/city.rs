//! Parses the `.city` instance format.

use crate::direction::Cell;
use crate::error::ParseError;
use crate::spec::Spec;
use std::path::Path;

/// Parse `.city` file contents (already read into memory) into a validated [`Spec`].
///
/// Blank lines are skipped everywhere: only the sequence of non-empty lines matters, never their
/// absolute line numbers.
pub fn parse_city(text: &str) -> Result<Spec, ParseError> {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

    let first = lines.next().ok_or(ParseError::Blank)?;
    let scenario: u8 = match first {
        "1" => 1,
        "2" => 2,
        other => return Err(ParseError::BadScenario(other.to_string())),
    };

    let params_line = lines.next().ok_or(ParseError::MissingParams)?;
    let params: Vec<&str> = params_line.split_whitespace().collect();
    let expected = if scenario == 1 { 4 } else { 5 };
    if params.len() != expected {
        return Err(ParseError::WrongParamCount {
            scenario,
            expected,
            got: params.len(),
        });
    }
    let nums: Vec<i64> = params
        .iter()
        .map(|t| t.parse().map_err(|_| ParseError::BadInt { token: t.to_string() }))
        .collect::<Result<_, _>>()?;
    let (n, m, k, j, p) = if scenario == 1 {
        (nums[0], nums[1], nums[2], nums[3], 0)
    } else {
        (nums[0], nums[1], nums[2], nums[3], nums[4])
    };
    if n <= 0 || m <= 0 || k < 0 || j < 0 || p < 0 {
        return Err(ParseError::InvalidHeader);
    }
    let k = k as usize;
    let j = j as usize;
    let p = p as usize;

    let mut starts = Vec::with_capacity(k);
    let mut ends = Vec::with_capacity(k);
    for idx in 0..k {
        let line = lines.next().ok_or(ParseError::TooFewLines { k })?;
        let toks: Vec<&str> = line.split_whitespace().collect();
        if toks.len() != 4 {
            return Err(ParseError::BadLineTokenCount {
                index: idx,
                got: toks.len(),
            });
        }
        let coords: Vec<i64> = toks
            .iter()
            .map(|t| t.parse().map_err(|_| ParseError::BadInt { token: t.to_string() }))
            .collect::<Result<_, _>>()?;
        let (sx, sy, ex, ey) = (coords[0], coords[1], coords[2], coords[3]);
        let start = Cell::new(sx, sy);
        let end = Cell::new(ex, ey);
        if !start.in_bounds(n, m) || !end.in_bounds(n, m) {
            return Err(ParseError::OutOfBounds {
                index: idx,
                sx,
                sy,
                ex,
                ey,
            });
        }
        starts.push(start);
        ends.push(end);
    }

    let mut popular = Vec::with_capacity(p);
    if scenario == 2 {
        let line = lines.next().ok_or(ParseError::MissingPopularLine)?;
        let toks: Vec<&str> = line.split_whitespace().collect();
        if toks.len() != 2 * p {
            return Err(ParseError::WrongPopularTokenCount {
                expected: 2 * p,
                p,
                got: toks.len(),
            });
        }
        let coords: Vec<i64> = toks
            .iter()
            .map(|t| t.parse().map_err(|_| ParseError::BadInt { token: t.to_string() }))
            .collect::<Result<_, _>>()?;
        for idx in 0..p {
            let x = coords[2 * idx];
            let y = coords[2 * idx + 1];
            let cell = Cell::new(x, y);
            if !cell.in_bounds(n, m) {
                return Err(ParseError::PopularOutOfBounds { index: idx, x, y });
            }
            popular.push(cell);
        }
    }

    Spec::new(scenario, n, m, j, starts, ends, popular)
}

/// Read and parse a `.city` file from disk.
pub fn parse_city_file(path: &Path) -> Result<Spec, ParseError> {
    let text = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_city(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scenario_one() {
        let text = "1\n4 4 1 1\n0 0 3 3\n";
        let spec = parse_city(text).unwrap();
        assert_eq!(spec.scenario, 1);
        assert_eq!((spec.n, spec.m, spec.k, spec.j), (4, 4, 1, 1));
        assert_eq!(spec.starts, vec![Cell::new(0, 0)]);
        assert_eq!(spec.ends, vec![Cell::new(3, 3)]);
    }

    #[test]
    fn parses_scenario_two_with_popular_cells() {
        let text = "2\n4 4 1 2 1\n0 0 3 3\n1 2\n";
        let spec = parse_city(text).unwrap();
        assert_eq!(spec.p, 1);
        assert_eq!(spec.popular, vec![Cell::new(1, 2)]);
    }

    #[test]
    fn skips_blank_lines() {
        let text = "\n\n1\n\n4 4 1 1\n\n0 0 3 3\n\n";
        assert!(parse_city(text).is_ok());
    }

    #[test]
    fn rejects_bad_scenario_tag() {
        let err = parse_city("3\n4 4 1 1\n0 0 1 1\n").unwrap_err();
        assert!(matches!(err, ParseError::BadScenario(_)));
    }

    #[test]
    fn rejects_out_of_bounds_coordinates() {
        let err = parse_city("1\n4 4 1 1\n0 0 9 9\n").unwrap_err();
        assert!(matches!(err, ParseError::OutOfBounds { .. }));
    }

    #[test]
    fn rejects_start_equals_end() {
        let err = parse_city("1\n1 1 1 0\n0 0 0 0\n").unwrap_err();
        assert!(matches!(err, ParseError::StartEqualsEnd));
    }

    #[test]
    fn rejects_wrong_param_count() {
        let err = parse_city("1\n4 4 1\n").unwrap_err();
        assert!(matches!(err, ParseError::WrongParamCount { .. }));
    }

    #[test]
    fn accepts_k_zero() {
        let spec = parse_city("1\n4 4 0 0\n").unwrap();
        assert_eq!(spec.k, 0);
    }

    #[test]
    fn reads_a_real_file_from_disk() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "1\n4 4 1 1\n0 0 3 3\n").unwrap();
        let spec = parse_city_file(file.path()).unwrap();
        assert_eq!(spec.k, 1);
    }

    #[test]
    fn reports_io_error_for_missing_file() {
        let err = parse_city_file(std::path::Path::new("/nonexistent/no.city")).unwrap_err();
        assert!(matches!(err, ParseError::Io { .. }));
    }
}
