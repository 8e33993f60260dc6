//! Utilities for handling strings

/// Characters that make the shell treat an argument as more than one word or expand it
const SHELL_SPECIAL: &[char] = &[
    ' ', '\t', '\n', '"', '\'', '\\', '$', '`', '&', '|', ';', '<', '>', '(', ')', '*', '?', '#',
    '~', '[', ']', '{', '}', '!',
];

/// Quotes `arg` so a POSIX shell reads it back as exactly one word
///
/// Arguments without special characters are returned untouched, everything else
/// gets wrapped in double quotes with `"`, `\`, `$` and `` ` `` escaped.
/// # Arguments
/// * `arg` - The argument to quote
pub fn quote_arg(arg: &str) -> String {
    if !arg.is_empty() && !arg.contains(SHELL_SPECIAL) {
        return arg.to_string();
    }

    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for c in arg.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');

    quoted
}

/// Returns the last line of `output` with surrounding whitespace trimmed
///
/// Empty output yields an empty string.
/// # Arguments
/// * `output` - The output of a command
pub fn last_line(output: &str) -> &str {
    output.lines().last().unwrap_or_default().trim()
}
