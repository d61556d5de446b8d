//! Security utilities for building SOQL command strings.
//!
//! ## SOQL Injection Prevention
//!
//! User-provided values embedded in a SOQL command MUST go through
//! [`soql::quote`] (or [`soql::escape_string`] when the quotes are already
//! part of the template).
//!
//! ```rust
//! use soql_connect_client::security::soql;
//!
//! let query = format!("SELECT Id FROM Contact WHERE LastName = {}", soql::quote("O'Brien"));
//! assert_eq!(query, r"SELECT Id FROM Contact WHERE LastName = 'O\'Brien'");
//! ```

/// SOQL escaping utilities for injection prevention.
pub mod soql {
    /// Escape a string value for use inside a SOQL string literal.
    ///
    /// Escapes `'`, `"`, `\`, newline, carriage return and tab with a
    /// backslash, which is the only escape form SOQL accepts.
    ///
    /// ```rust
    /// use soql_connect_client::security::soql;
    ///
    /// assert_eq!(soql::escape_string("O'Brien & Co."), "O\\'Brien & Co.");
    /// ```
    #[must_use]
    pub fn escape_string(value: &str) -> String {
        let mut escaped = String::with_capacity(value.len() + 16);
        for ch in value.chars() {
            match ch {
                '\'' => escaped.push_str("\\'"),
                '"' => escaped.push_str("\\\""),
                '\\' => escaped.push_str("\\\\"),
                '\n' => escaped.push_str("\\n"),
                '\r' => escaped.push_str("\\r"),
                '\t' => escaped.push_str("\\t"),
                _ => escaped.push(ch),
            }
        }
        escaped
    }

    /// Escape a value and wrap it in single quotes.
    #[must_use]
    pub fn quote(value: &str) -> String {
        format!("'{}'", escape_string(value))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_escape_string() {
            assert_eq!(escape_string("plain"), "plain");
            assert_eq!(escape_string("O'Brien"), "O\\'Brien");
            assert_eq!(escape_string("back\\slash"), "back\\\\slash");
            assert_eq!(escape_string("say \"hi\""), "say \\\"hi\\\"");
            assert_eq!(escape_string("a\nb\rc\td"), "a\\nb\\rc\\td");
        }

        #[test]
        fn test_escape_string_injection_attempt() {
            let escaped = escape_string("' OR Name LIKE '%");
            assert_eq!(escaped, "\\' OR Name LIKE \\'%");
        }

        #[test]
        fn test_quote_leaves_no_bare_single_quote() {
            let quoted = quote("O'Brien");
            assert_eq!(quoted, "'O\\'Brien'");

            let inner = &quoted[1..quoted.len() - 1];
            let bytes = inner.as_bytes();
            for (i, b) in bytes.iter().enumerate() {
                if *b == b'\'' {
                    assert!(i > 0 && bytes[i - 1] == b'\\', "unescaped quote at {i}");
                }
            }
        }

        #[test]
        fn test_quote_empty_and_unicode() {
            assert_eq!(quote(""), "''");
            assert_eq!(quote("Zoë"), "'Zoë'");
        }
    }
}
