//! Table formatting utilities for CLI output.

/// Truncate to `max_len` characters, ending in "..." when shortened.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

pub fn print_separator(width: usize) {
    println!("{}", "-".repeat(width));
}

/// Display value of an optional field.
pub fn format_optional<T: std::fmt::Display>(value: Option<&T>, default: &str) -> String {
    value.map_or_else(|| default.to_string(), ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation() {
        assert_eq!(truncate_string("Shaft A", 10), "Shaft A");
        assert_eq!(truncate_string("Conveyor belt north", 10), "Conveyo...");
        assert_eq!(truncate_string("Förderband Süd", 8), "Förde...");
    }

    #[test]
    fn optional_values() {
        assert_eq!(format_optional(Some(&"Level 3"), "--"), "Level 3");
        assert_eq!(format_optional::<String>(None, "--"), "--");
    }
}
