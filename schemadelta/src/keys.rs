//! Identity-key helpers shared by snapshots and the difference builder.
//!
//! Every comparable object is matched across the two databases by a string
//! key that does not depend on which side it came from.

use std::fmt::Write;

/// Quote a single identifier part with brackets unless it already is.
pub fn quote(part: &str) -> String {
    if part.starts_with('[') && part.ends_with(']') && part.len() >= 2 {
        part.to_string()
    } else {
        bracket(part)
    }
}

fn bracket(part: &str) -> String {
    format!("[{}]", part.replace(']', "]]"))
}

/// Fully-qualified `[schema].[object]` name.
pub fn qualified_name(schema: &str, name: &str) -> String {
    format!("{}.{}", quote(schema), quote(name))
}

/// Split a dotted name into its unquoted parts, honouring brackets and `]]`
/// escapes (`[dbo].[a.b]` -> `dbo`, `a.b`).
pub fn name_parts(qualified: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut bracketed = false;
    let mut chars = qualified.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '[' if !bracketed && current.is_empty() => bracketed = true,
            ']' if bracketed => {
                if chars.peek() == Some(&']') {
                    chars.next();
                    current.push(']');
                } else {
                    bracketed = false;
                }
            }
            '.' if !bracketed => parts.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    parts.push(current);
    parts
}

/// Canonical bracketed form of a dotted name (`dbo.V` -> `[dbo].[V]`).
pub fn canonical_name(name: &str) -> String {
    name_parts(name).iter().map(|part| bracket(part)).collect::<Vec<_>>().join(".")
}

/// File name used for an object's definition body inside a directory dump.
///
/// Each name part keeps ASCII letters, digits and `_-@#$`; every other byte
/// is percent-encoded, so distinct names never share a file.
pub fn definition_file_name(qualified: &str) -> String {
    let parts: Vec<String> = name_parts(qualified).iter().map(|part| encode_file_part(part)).collect();
    format!("{}.sql", parts.join("."))
}

fn encode_file_part(part: &str) -> String {
    let mut encoded = String::with_capacity(part.len());
    for byte in part.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'-' | b'@' | b'#' | b'$') {
            encoded.push(char::from(byte));
        } else {
            let _ = write!(encoded, "%{byte:02X}");
        }
    }
    encoded
}

/// Key of a permission record: who, what, how, on which object and column.
pub fn permission_key(principal: &str, permission: &str, state: &str, owner: &str, column: Option<&str>) -> String {
    match column {
        Some(column) => format!("{state} {permission} on {owner} ({}) to {principal}", quote(column)),
        None => format!("{state} {permission} on {owner} to {principal}"),
    }
}

/// Key of an extended property: the owner path followed by the property name.
pub fn property_key(owner: &str, name: &str) -> String {
    format!("{owner}: {name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_qualified_names() {
        assert_eq!(qualified_name("dbo", "Users"), "[dbo].[Users]");
        assert_eq!(qualified_name("[dbo]", "[Users]"), "[dbo].[Users]");
        assert_eq!(qualified_name("dbo", "odd]name"), "[dbo].[odd]]name]");
    }

    #[test]
    fn splits_and_canonicalizes_names() {
        assert_eq!(name_parts("[dbo].[odd]]name]"), vec!["dbo", "odd]name"]);
        assert_eq!(name_parts("[dbo].[a.b]"), vec!["dbo", "a.b"]);
        assert_eq!(canonical_name("dbo.V"), "[dbo].[V]");
        assert_eq!(canonical_name("[dbo].[V]"), "[dbo].[V]");
        assert_eq!(canonical_name("[dbo].[odd]]name]"), "[dbo].[odd]]name]");
    }

    #[test]
    fn definition_file_names_never_collide() {
        assert_eq!(definition_file_name("[dbo].[V]"), "dbo.V.sql");
        assert_eq!(definition_file_name("[sales].[Top Customers]"), "sales.Top%20Customers.sql");

        let names = ["[dbo].[A B]", "[dbo].[A_B]", "[dbo].[A%20B]", "[a.b].[c]", "[a].[b.c]"];
        let files: std::collections::HashSet<String> = names.iter().map(|name| definition_file_name(name)).collect();
        assert_eq!(files.len(), names.len());
    }

    #[test]
    fn builds_permission_keys() {
        assert_eq!(
            permission_key("reporting", "SELECT", "GRANT", "[dbo].[T]", None),
            "GRANT SELECT on [dbo].[T] to reporting"
        );
        assert_eq!(
            permission_key("reporting", "UPDATE", "DENY", "[dbo].[T]", Some("Salary")),
            "DENY UPDATE on [dbo].[T] ([Salary]) to reporting"
        );
    }
}
