//! MySQL identifier quoting.

/// Quotes a possibly qualified identifier with backticks.
///
/// Backticks inside the name are doubled and each `.` separates a qualifier,
/// so `app.users` becomes `` `app`.`users` ``.
///
/// # Example
/// ```rust
/// use rowkeep_core::quote_identifier;
///
/// assert_eq!(quote_identifier("users"), "`users`");
/// assert_eq!(quote_identifier("app.users"), "`app`.`users`");
/// assert_eq!(quote_identifier("we`ird"), "`we``ird`");
/// ```
pub fn quote_identifier(name: &str) -> String {
    let mut quoted = String::with_capacity(name.len().saturating_add(2));
    quoted.push('`');
    for ch in name.chars() {
        match ch {
            '`' => quoted.push_str("``"),
            '.' => quoted.push_str("`.`"),
            other => quoted.push(other),
        }
    }
    quoted.push('`');
    quoted
}

/// Quotes a single identifier, keeping any `.` as part of the name.
///
/// Used for database names, which cannot be qualified.
pub fn quote_unqualified(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}
