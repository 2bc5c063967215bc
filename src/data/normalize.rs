use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Legal-entity suffixes, whole words only, with an optional trailing period.
    static ref LEGAL_SUFFIX: Regex =
        Regex::new(r"\b(LTD|LLC|INC|CO|COMPANY|LIMITED|PRIVATE)\b\.?").unwrap();
}

/// Canonical form of a company name used for same-entity comparison.
///
/// Upper-cases, drops legal-entity suffix tokens and trims the result.
/// Inner whitespace left behind by a removed token is kept as-is.
pub fn normalize_name(name: &str) -> String {
    let upper = name.to_uppercase();
    LEGAL_SUFFIX.replace_all(&upper, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_suffix_with_period() {
        assert_eq!(normalize_name("Acme Co."), normalize_name("ACME"));
        assert_eq!(normalize_name("Acme Co."), "ACME");
    }

    #[test]
    fn strips_every_listed_suffix() {
        for suffix in ["Ltd", "LLC", "inc.", "Company", "Limited", "Private"] {
            assert_eq!(normalize_name(&format!("Acme {suffix}")), "ACME", "{suffix}");
        }
    }

    #[test]
    fn only_matches_whole_words() {
        assert_eq!(normalize_name("Incorporation LLC"), "INCORPORATION");
        assert_ne!(normalize_name("Incorporation LLC"), normalize_name("Orporation"));
        assert_eq!(normalize_name("Costco"), "COSTCO");
    }

    #[test]
    fn empty_is_empty() {
        assert_eq!(normalize_name(""), "");
        assert_eq!(normalize_name("   "), "");
    }

    #[test]
    fn private_limited_collapses() {
        assert_eq!(normalize_name("Sterlite Private Limited"), "STERLITE");
    }
}
