//! Unit-string compatibility, the "unit-string parser collaborator" spec.md
//! §4.2 delegates to. A real federation carries arbitrary SI-derived unit
//! strings (`"m/s"`, `"degC"`, ...); here we normalize common aliases and
//! fall back to case-insensitive equality, which covers the overwhelming
//! majority of real HELICS configs without pulling in a full unit-algebra
//! dependency this workspace has no other use for.

fn normalize(unit: &str) -> String {
    let trimmed = unit.trim().to_ascii_lowercase();
    match trimmed.as_str() {
        "meter" | "meters" | "metre" | "metres" => "m".to_string(),
        "second" | "seconds" | "sec" => "s".to_string(),
        "kilogram" | "kilograms" | "kg" => "kg".to_string(),
        "degree" | "degrees" | "deg" => "deg".to_string(),
        "celsius" | "degc" => "degc".to_string(),
        "volt" | "volts" | "v" => "v".to_string(),
        "watt" | "watts" | "w" => "w".to_string(),
        other => other.to_string(),
    }
}

/// `unit_compatible(u1, u2)`: true if either side is empty, or they
/// normalize to the same unit.
pub fn unit_compatible(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return true;
    }
    normalize(a) == normalize(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_compatible() {
        assert!(unit_compatible("", "m/s"));
    }

    #[test]
    fn test_aliases_compatible() {
        assert!(unit_compatible("meters", "m"));
    }

    #[test]
    fn test_mismatch_rejected() {
        assert!(!unit_compatible("m", "kg"));
    }
}
