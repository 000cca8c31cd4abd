//! Employee name handling

/// Used when a name has no usable token after the honorific
pub const DEFAULT_FIRST_NAME: &str = "Employee";

/// Recognised honorifics, longest first so "Mrs" wins over "Mr"
const HONORIFICS: [&str; 3] = ["mrs", "mr", "ms"];

/// Strip a leading honorific (Mr, Ms, Mrs, with or without a period)
///
/// Matching is case-insensitive and only applies to a whole leading token,
/// so names such as "Mrinal" are left alone. "Mr.John" is treated as
/// "Mr." followed by "John".
///
/// # Examples
/// ```
/// use letter_text::strip_honorific;
/// assert_eq!(strip_honorific("Mrs. Jane Doe"), "Jane Doe");
/// assert_eq!(strip_honorific("Mrinal Sen"), "Mrinal Sen");
/// ```
pub fn strip_honorific(name: &str) -> &str {
    let trimmed = name.trim_start();
    let token_end = trimmed
        .find(char::is_whitespace)
        .unwrap_or(trimmed.len());
    let token = &trimmed[..token_end];

    for honorific in HONORIFICS {
        let is_prefix = token
            .get(..honorific.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(honorific));
        if !is_prefix {
            continue;
        }

        let tail = &token[honorific.len()..];
        if tail.is_empty() {
            return trimmed[token_end..].trim_start();
        }
        if let Some(rest) = tail.strip_prefix('.') {
            if rest.is_empty() {
                return trimmed[token_end..].trim_start();
            }
            // "Mr.John Smith": the name starts right after the period
            let offset = honorific.len() + 1;
            return &trimmed[offset..];
        }
    }

    trimmed
}

/// Extract the first name from a full name
///
/// Strips the honorific, takes the first whitespace-delimited token and
/// falls back to [`DEFAULT_FIRST_NAME`] when nothing is left.
///
/// # Examples
/// ```
/// use letter_text::first_name;
/// assert_eq!(first_name("Mr Manvendra Singh"), "Manvendra");
/// assert_eq!(first_name(""), "Employee");
/// ```
pub fn first_name(full_name: &str) -> String {
    strip_honorific(full_name)
        .split_whitespace()
        .next()
        .unwrap_or(DEFAULT_FIRST_NAME)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strip_honorific_plain() {
        assert_eq!(strip_honorific("Mr Manvendra Singh"), "Manvendra Singh");
        assert_eq!(strip_honorific("Ms Priya Rao"), "Priya Rao");
        assert_eq!(strip_honorific("Mrs Anita Desai"), "Anita Desai");
    }

    #[test]
    fn test_strip_honorific_with_period() {
        assert_eq!(strip_honorific("Mr. Manvendra Singh"), "Manvendra Singh");
        assert_eq!(strip_honorific("Mrs.Anita Desai"), "Anita Desai");
    }

    #[test]
    fn test_strip_honorific_case_insensitive() {
        assert_eq!(strip_honorific("MR manvendra"), "manvendra");
        assert_eq!(strip_honorific("mrs. anita"), "anita");
    }

    #[test]
    fn test_strip_honorific_leaves_names_alone() {
        assert_eq!(strip_honorific("Mrinal Sen"), "Mrinal Sen");
        assert_eq!(strip_honorific("Msiska Banda"), "Msiska Banda");
        assert_eq!(strip_honorific("Manvendra Singh"), "Manvendra Singh");
    }

    #[test]
    fn test_first_name() {
        assert_eq!(first_name("Mr Manvendra Singh"), "Manvendra");
        assert_eq!(first_name("Mrs. Anita Desai"), "Anita");
        assert_eq!(first_name("Priya"), "Priya");
        assert_eq!(first_name("  Ms   Priya   Rao "), "Priya");
    }

    #[test]
    fn test_first_name_defaults() {
        assert_eq!(first_name(""), DEFAULT_FIRST_NAME);
        assert_eq!(first_name("   "), DEFAULT_FIRST_NAME);
        assert_eq!(first_name("Mr"), DEFAULT_FIRST_NAME);
        assert_eq!(first_name("Ms. "), DEFAULT_FIRST_NAME);
    }
}
