//! Identifier sanitization.
//!
//! Table and column names come from untrusted file names and header cells. They are
//! always passed through [`sanitize_identifier`] and [`validate_identifier`] before they
//! reach a statement, and are then double-quoted by the store.

use crate::error::{ImportError, ImportResult};

/// Keywords rejected as table or column names (compared case-insensitively).
const RESERVED_WORDS: &[&str] = &[
    "ADD", "ALL", "ALTER", "AND", "AS", "ASC", "BETWEEN", "BY", "CASE", "CHECK", "COLLATE",
    "COLUMN", "COMMIT", "CONSTRAINT", "CREATE", "CROSS", "DEFAULT", "DELETE", "DESC",
    "DISTINCT", "DROP", "ELSE", "END", "ESCAPE", "EXCEPT", "EXISTS", "FOREIGN", "FROM",
    "FULL", "GROUP", "HAVING", "IN", "INDEX", "INNER", "INSERT", "INTERSECT", "INTO", "IS",
    "JOIN", "KEY", "LEFT", "LIKE", "LIMIT", "NOT", "NULL", "OF", "OFFSET", "ON", "OR",
    "ORDER", "OUTER", "PRIMARY", "REFERENCES", "RIGHT", "ROLLBACK", "ROWID", "SELECT", "SET",
    "TABLE", "THEN", "TO", "TRANSACTION", "UNION", "UNIQUE", "UPDATE", "USING", "VALUES",
    "VIEW", "WHEN", "WHERE", "WITH",
];

/// Prefix the store reserves for its own tables.
const STORE_RESERVED_PREFIX: &str = "sqlite_";

/// Map an arbitrary string to a safe identifier.
///
/// Every character that is not an ASCII letter, digit, or underscore is replaced by a
/// single `_`, so the output has as many characters as the input. Collisions are not
/// resolved here (`"a-b"` and `"a.b"` both become `"a_b"`).
pub fn sanitize_identifier(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Reject sanitized names that must not be used as identifiers.
pub fn validate_identifier(name: &str) -> ImportResult<()> {
    let invalid = |reason: &str| ImportError::InvalidIdentifier {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("identifier is empty"));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid("identifier is not sanitized"));
    }
    if is_reserved_word(name) {
        return Err(invalid("identifier is a reserved word"));
    }
    if name.to_ascii_lowercase().starts_with(STORE_RESERVED_PREFIX) {
        return Err(invalid("identifier uses a prefix reserved by the database"));
    }
    Ok(())
}

pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.iter().any(|w| w.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{is_reserved_word, sanitize_identifier, validate_identifier};
    use crate::error::ImportError;

    proptest! {
        #[test]
        fn sanitize_is_total_and_length_preserving(raw in any::<String>()) {
            let out = sanitize_identifier(&raw);
            prop_assert!(out.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
            prop_assert_eq!(out.chars().count(), raw.chars().count());
        }

        #[test]
        fn sanitize_is_idempotent(raw in "\\PC*") {
            let once = sanitize_identifier(&raw);
            prop_assert_eq!(sanitize_identifier(&once), once.clone());
        }
    }

    #[test]
    fn sanitize_replaces_each_disallowed_char() {
        assert_eq!(sanitize_identifier("Order ID"), "Order_ID");
        assert_eq!(sanitize_identifier("2024 Q1 Sales!"), "2024_Q1_Sales_");
        assert_eq!(sanitize_identifier("Amount ($)"), "Amount____");
        assert_eq!(sanitize_identifier("already_ok_123"), "already_ok_123");
        assert_eq!(sanitize_identifier(""), "");
    }

    #[test]
    fn sanitize_does_not_deduplicate() {
        assert_eq!(sanitize_identifier("a-b"), sanitize_identifier("a.b"));
    }

    #[test]
    fn sanitize_preserves_char_count_for_non_ascii() {
        let raw = "Straße – Größe";
        let out = sanitize_identifier(raw);
        assert_eq!(out.chars().count(), raw.chars().count());
        assert!(out.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
        assert_eq!(out, "Stra_e___Gr__e");
    }

    #[test]
    fn validate_rejects_empty_reserved_and_store_prefix() {
        assert!(matches!(
            validate_identifier(""),
            Err(ImportError::InvalidIdentifier { .. })
        ));
        assert!(matches!(
            validate_identifier("select"),
            Err(ImportError::InvalidIdentifier { .. })
        ));
        assert!(matches!(
            validate_identifier("SQLITE_master"),
            Err(ImportError::InvalidIdentifier { .. })
        ));
        assert!(matches!(
            validate_identifier("a b"),
            Err(ImportError::InvalidIdentifier { .. })
        ));
        validate_identifier("Order_ID").unwrap();
        validate_identifier("_").unwrap();
        validate_identifier("2024_Q1_Sales_").unwrap();
    }

    #[test]
    fn reserved_words_are_case_insensitive() {
        assert!(is_reserved_word("Order"));
        assert!(is_reserved_word("TABLE"));
        assert!(!is_reserved_word("orders"));
    }
}
