//! ISO-8601 video durations

use regex::Regex;
use std::sync::OnceLock;

static DURATION_RE: OnceLock<Regex> = OnceLock::new();

fn duration_re() -> &'static Regex {
    DURATION_RE.get_or_init(|| {
        Regex::new(r"PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?").expect("duration pattern is valid")
    })
}

/// Convert `PT#H#M#S` to whole seconds
///
/// Each component is optional and counts as zero when absent. Input without
/// a `PT` marker yields zero.
pub fn parse_duration_seconds(input: &str) -> i64 {
    let Some(caps) = duration_re().captures(input) else {
        return 0;
    };

    let part = |idx: usize| -> i64 {
        caps.get(idx)
            .and_then(|m| m.as_str().parse::<i64>().ok())
            .unwrap_or(0)
    };

    part(1)
        .saturating_mul(3600)
        .saturating_add(part(2).saturating_mul(60))
        .saturating_add(part(3))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_duration() {
        assert_eq!(parse_duration_seconds("PT1H2M3S"), 3723);
    }

    #[test]
    fn test_partial_durations() {
        assert_eq!(parse_duration_seconds("PT45S"), 45);
        assert_eq!(parse_duration_seconds("PT2M"), 120);
        assert_eq!(parse_duration_seconds("PT1H"), 3600);
        assert_eq!(parse_duration_seconds("PT1H30S"), 3630);
    }

    #[test]
    fn test_empty_and_malformed() {
        assert_eq!(parse_duration_seconds("PT"), 0);
        assert_eq!(parse_duration_seconds("1H2M3S"), 0);
        assert_eq!(parse_duration_seconds(""), 0);
        assert_eq!(parse_duration_seconds("P0D"), 0);
    }

    #[test]
    fn test_parse_is_stable() {
        for _ in 0..3 {
            assert_eq!(parse_duration_seconds("PT10M5S"), 605);
        }
    }
}
