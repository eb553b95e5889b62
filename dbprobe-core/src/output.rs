//! Diagnostic output formatting.
//!
//! Line formats match the legacy diagnostic script byte for byte, including
//! its Python-style quoting of strings inside the configuration mapping and
//! the table list.

use crate::config::ConnectionConfig;
use crate::diagnostics::ServerIdentity;
use crate::security::REDACTED;
use std::fmt::Write as _;

/// Renders the configuration mapping printed before connecting.
///
/// The password is masked unless `reveal_password` is set.
///
/// # Example
/// ```rust
/// use dbprobe_core::config::ConnectionConfig;
/// use dbprobe_core::output::format_config_line;
/// use dbprobe_core::security::Password;
///
/// let config = ConnectionConfig {
///     host: "db.local".to_string(),
///     port: 3306,
///     user: "app".to_string(),
///     password: Password::new("secret".to_string()),
///     database: "appdb".to_string(),
/// };
///
/// assert_eq!(
///     format_config_line(&config, false),
///     "{'host': 'db.local', 'port': 3306, 'user': 'app', 'password': '****', 'database': 'appdb'}"
/// );
/// ```
pub fn format_config_line(config: &ConnectionConfig, reveal_password: bool) -> String {
    let password = if reveal_password {
        config.password.expose()
    } else {
        REDACTED
    };

    format!(
        "{{'host': {}, 'port': {}, 'user': {}, 'password': {}, 'database': {}}}",
        quote_str(&config.host),
        config.port,
        quote_str(&config.user),
        quote_str(password),
        quote_str(&config.database),
    )
}

/// Renders the server identity line.
pub fn format_identity_line(identity: &ServerIdentity) -> String {
    format!(
        "MySQL VERSION={}, USER={}, DB={}",
        identity.version,
        identity.current_user,
        identity.database.as_deref().unwrap_or("None")
    )
}

/// Renders the table list line, e.g. `Tables: ['users', 'orders']`.
pub fn format_tables_line(tables: &[String]) -> String {
    let quoted: Vec<String> = tables.iter().map(|name| quote_str(name)).collect();
    format!("Tables: [{}]", quoted.join(", "))
}

/// Quotes a string the way Python's `repr(str)` does.
///
/// Single quotes are used unless the value contains a single quote and no
/// double quote. Control characters, whitespace other than a plain space,
/// and the common invisible format characters are escaped as `\xNN`,
/// `\uNNNN`, or `\UNNNNNNNN`. Unassigned and private-use code points are
/// printed as is, where Python would escape them.
pub fn quote_str(value: &str) -> String {
    let quote = if value.contains('\'') && !value.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut quoted = String::with_capacity(value.len().saturating_add(2));
    quoted.push(quote);
    for ch in value.chars() {
        match ch {
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if c == quote => {
                quoted.push('\\');
                quoted.push(c);
            }
            c if is_unprintable(c) => push_escaped(&mut quoted, c),
            c => quoted.push(c),
        }
    }
    quoted.push(quote);
    quoted
}

fn is_unprintable(c: char) -> bool {
    c.is_control()
        || (c.is_whitespace() && c != ' ')
        || matches!(
            c,
            '\u{ad}'
                | '\u{600}'..='\u{605}'
                | '\u{61c}'
                | '\u{180e}'
                | '\u{200b}'..='\u{200f}'
                | '\u{202a}'..='\u{202e}'
                | '\u{2060}'..='\u{2064}'
                | '\u{2066}'..='\u{206f}'
                | '\u{feff}'
                | '\u{fff9}'..='\u{fffb}'
                | '\u{e0001}'
                | '\u{e0020}'..='\u{e007f}'
        )
}

fn push_escaped(quoted: &mut String, c: char) {
    let code = u32::from(c);
    let _ = if code < 0x100 {
        write!(quoted, "\\x{:02x}", code)
    } else if code < 0x1_0000 {
        write!(quoted, "\\u{:04x}", code)
    } else {
        write!(quoted, "\\U{:08x}", code)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::Password;

    fn sample_config() -> ConnectionConfig {
        ConnectionConfig {
            host: "db.local".to_string(),
            port: 3306,
            user: "app".to_string(),
            password: Password::new("secret".to_string()),
            database: "appdb".to_string(),
        }
    }

    #[test]
    fn test_config_line_masks_credential() {
        let line = format_config_line(&sample_config(), false);
        assert!(!line.contains("secret"));
        assert!(line.contains("'password': '****'"));
    }

    #[test]
    fn test_config_line_reveals_credential_on_request() {
        let line = format_config_line(&sample_config(), true);
        assert_eq!(
            line,
            "{'host': 'db.local', 'port': 3306, 'user': 'app', 'password': 'secret', 'database': 'appdb'}"
        );
    }

    #[test]
    fn test_identity_line() {
        let identity = ServerIdentity {
            version: "8.0.34".to_string(),
            current_user: "app@%".to_string(),
            database: Some("appdb".to_string()),
        };
        assert_eq!(
            format_identity_line(&identity),
            "MySQL VERSION=8.0.34, USER=app@%, DB=appdb"
        );
    }

    #[test]
    fn test_identity_line_without_database() {
        let identity = ServerIdentity {
            version: "5.7.44".to_string(),
            current_user: "root@localhost".to_string(),
            database: None,
        };
        assert_eq!(
            format_identity_line(&identity),
            "MySQL VERSION=5.7.44, USER=root@localhost, DB=None"
        );
    }

    #[test]
    fn test_tables_line() {
        let tables = vec!["users".to_string(), "orders".to_string()];
        assert_eq!(format_tables_line(&tables), "Tables: ['users', 'orders']");
        assert_eq!(format_tables_line(&[]), "Tables: []");
    }

    #[test]
    fn test_quote_str_matches_python_repr() {
        assert_eq!(quote_str("users"), "'users'");
        assert_eq!(quote_str("it's"), "\"it's\"");
        assert_eq!(quote_str("both'\""), "'both\\'\"'");
        assert_eq!(quote_str("back\\slash"), "'back\\\\slash'");
        assert_eq!(quote_str("tab\there"), "'tab\\there'");
        assert_eq!(quote_str("bell\u{7}"), "'bell\\x07'");
        assert_eq!(quote_str("테이블"), "'테이블'");
    }

    #[test]
    fn test_quote_str_escapes_unprintable_code_points() {
        assert_eq!(quote_str("a\u{85}b"), "'a\\x85b'");
        assert_eq!(quote_str("nb\u{a0}sp"), "'nb\\xa0sp'");
        assert_eq!(quote_str("del\u{7f}"), "'del\\x7f'");
        assert_eq!(quote_str("zero\u{200b}width"), "'zero\\u200bwidth'");
        assert_eq!(quote_str("\u{feff}bom"), "'\\ufeffbom'");
        assert_eq!(quote_str("line\u{2028}sep"), "'line\\u2028sep'");
        assert_eq!(quote_str("tag\u{e0001}"), "'tag\\U000e0001'");
        assert_eq!(quote_str("with space"), "'with space'");
    }
}
