//! User domain rules.

/// Maximum stored length of a display name (matches the `users.name` column).
pub const MAX_NAME_LEN: usize = 255;

/// Compose the display name from a Telegram chat's first and last name.
///
/// Names longer than [`MAX_NAME_LEN`] characters are truncated on a char
/// boundary so the value always fits the column.
pub fn display_name(first_name: &str, last_name: Option<&str>) -> String {
    let full = match last_name.filter(|l| !l.is_empty()) {
        Some(last) => format!("{first_name} {last}"),
        None => first_name.to_owned(),
    };
    full.chars().take(MAX_NAME_LEN).collect()
}
