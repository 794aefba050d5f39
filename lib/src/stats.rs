use once_cell::sync::Lazy;
use regex::Regex;

static REGEX_STATS_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[Files:\s+(\d+).*Todo:\s+(\d+)").unwrap());

/// Extract `(files completed, files remaining)` from one line of mirror tool
/// output, if it contains the periodic statistics marker.
///
/// Anything that does not match is simply not a statistics line; malformed
/// input is never an error.
pub fn parse_stats_line(line: &str) -> Option<(u64, u64)> {
    let caps = REGEX_STATS_LINE.captures(line)?;

    let completed = caps[1].parse().ok()?;
    let remaining = caps[2].parse().ok()?;

    Some((completed, remaining))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_statistics_line() {
        assert_eq!(parse_stats_line("[Files:    12 ... Todo:     5"), Some((12, 5)));
    }

    #[test]
    fn parses_statistics_line_with_surrounding_text() {
        let line = "12:34:56 [Files:     3  Bytes:  1M [12K/s] Redirects:     0  Todo:    40  Errors:     0";

        assert_eq!(parse_stats_line(line), Some((3, 40)));
    }

    #[test]
    fn ignores_ordinary_log_lines() {
        assert_eq!(parse_stats_line("random log text"), None);
        assert_eq!(parse_stats_line(""), None);
        assert_eq!(parse_stats_line("[Files: zero ... Todo: none"), None);
    }

    #[test]
    fn tolerates_non_ascii_text() {
        assert_eq!(parse_stats_line("héllo wörld [Files:  3 ... Todo:  4"), Some((3, 4)));
        assert_eq!(parse_stats_line("héllo wörld \u{fffd}"), None);
    }
}
