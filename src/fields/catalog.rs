use crate::fields::types::FieldDefinition;

/// Pattern of the built-in `email` field
pub const EMAIL_PATTERN: &str = r"([a-zA-Z0-9._-]+@[a-zA-Z0-9._-]+\.[a-zA-Z0-9_-]+)";

/// Fields the output pipeline derives from every crawled URL
const PREDEFINED_FIELD_NAMES: &[&str] = &[
    "url", "path", "fqdn", "rdn", "rurl", "qurl", "qpath", "file", "ufile", "key", "value", "kv",
    "dir", "udir",
];

/// Names of the fields returned by [`default_fields`]
const DEFAULT_FIELD_NAMES: &[&str] = &["email"];

/// Built-in field definitions, also written to a freshly created field file
pub fn default_fields() -> Vec<FieldDefinition> {
    vec![FieldDefinition::new("email", 0, vec![EMAIL_PATTERN.to_string()])]
}

/// Every name a custom field may not take
pub fn reserved_names() -> Vec<String> {
    PREDEFINED_FIELD_NAMES
        .iter()
        .chain(DEFAULT_FIELD_NAMES)
        .map(|name| name.to_string())
        .collect()
}

pub fn is_reserved(name: &str) -> bool {
    PREDEFINED_FIELD_NAMES.contains(&name) || DEFAULT_FIELD_NAMES.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_compiles() {
        for mut field in default_fields() {
            field.compile().unwrap();
            assert!(field.is_compiled());
        }
    }

    #[test]
    fn test_email_field_matches_address() {
        let mut field = default_fields().remove(0);
        field.compile().unwrap();

        assert_eq!(field.extract("contact a@b.com today"), vec!["a@b.com"]);
    }

    #[test]
    fn test_default_names_match_catalog() {
        let names: Vec<String> = default_fields().into_iter().map(|f| f.name).collect();
        assert_eq!(names, DEFAULT_FIELD_NAMES);
    }

    #[test]
    fn test_reserved_names() {
        assert!(is_reserved("email"));
        assert!(is_reserved("fqdn"));
        assert!(!is_reserved("phone"));

        let names = reserved_names();
        assert!(names.contains(&"email".to_string()));
        assert!(names.contains(&"udir".to_string()));
    }
}
