/// Strip a telemetry reading down to its digits and decimal points.
///
/// `"75 C"` becomes `"75"`, `"250.00 W"` becomes `"250.00"`. Dots are kept in
/// input order and never deduplicated, so `"1.2.3"` passes through unchanged.
/// Anything with no digit or dot at all (including the empty string and
/// `"N/A"`) becomes `"0"`.
pub fn coerce_numeric(value: &str) -> String {
    let digits: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if digits.is_empty() {
        "0".to_string()
    } else {
        digits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_unit_suffixes() {
        assert_eq!(coerce_numeric("75 C"), "75");
        assert_eq!(coerce_numeric("250.00 W"), "250.00");
        assert_eq!(coerce_numeric("40 %"), "40");
        assert_eq!(coerce_numeric("16376 MiB"), "16376");
        assert_eq!(coerce_numeric("1911 MHz"), "1911");
    }

    #[test]
    fn test_empty_and_non_numeric_become_zero() {
        assert_eq!(coerce_numeric(""), "0");
        assert_eq!(coerce_numeric("N/A"), "0");
        assert_eq!(coerce_numeric("   "), "0");
        assert_eq!(coerce_numeric("°C"), "0");
    }

    #[test]
    fn test_dots_are_not_deduplicated() {
        assert_eq!(coerce_numeric("535.104.05"), "535.104.05");
        assert_eq!(coerce_numeric("..1.."), "..1..");
        assert_eq!(coerce_numeric("."), ".");
    }

    #[test]
    fn test_non_ascii_digits_are_dropped() {
        // Arabic-indic and fullwidth digits are not ASCII
        assert_eq!(coerce_numeric("٣"), "0");
        assert_eq!(coerce_numeric("１2"), "2");
    }

    #[test]
    fn test_output_only_digits_and_dots() {
        let inputs = ["75 C", "abc", "-1.5e3", "x.y.z", "", "12,345", "+7"];
        for input in inputs {
            let out = coerce_numeric(input);
            assert!(
                out.chars().all(|c| c.is_ascii_digit() || c == '.'),
                "{input:?} -> {out:?}"
            );
        }
        assert_eq!(coerce_numeric("-1.5e3"), "1.53");
        assert_eq!(coerce_numeric("12,345"), "12345");
    }

    #[test]
    fn test_idempotent() {
        let inputs = ["75 C", "", "N/A", "1.2.3 V", "٣", "..", "0"];
        for input in inputs {
            let once = coerce_numeric(input);
            assert_eq!(coerce_numeric(&once), once, "input {input:?}");
        }
    }
}
