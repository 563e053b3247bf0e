use regex::Regex;
use std::sync::OnceLock;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

/// `local@domain.tld` with no whitespace and a single `@` separating the parts.
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Emails are compared case-insensitively; store and look them up lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Trimmed value of an optional field, `None` when absent or blank.
pub fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// All fields present, or `None` if any is missing or blank.
pub fn all_present<'a, const N: usize>(fields: [&'a Option<String>; N]) -> Option<[&'a str; N]> {
    let mut out = [""; N];
    for (slot, field) in out.iter_mut().zip(fields) {
        *slot = present(field)?;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_format() {
        assert!(is_valid_email("donor@example.org"));
        assert!(is_valid_email("a.b+c@sub.domain.in"));
        assert!(!is_valid_email("no-at-sign.org"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("has space@example.org"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn normalize_lowercases_and_trims() {
        assert_eq!(normalize_email("  Donor@Example.ORG "), "donor@example.org");
    }

    #[test]
    fn present_trims_and_rejects_blank() {
        assert_eq!(present(&Some("  x ".into())), Some("x"));
        assert_eq!(present(&Some("   ".into())), None);
        assert_eq!(present(&None), None);
    }

    #[test]
    fn all_present_requires_every_field() {
        let a = Some("a".to_string());
        let b = Some("b".to_string());
        let blank = Some(String::new());
        assert_eq!(all_present([&a, &b]), Some(["a", "b"]));
        assert_eq!(all_present([&a, &blank]), None);
        assert_eq!(all_present([&a, &None]), None);
    }
}
