use std::collections::HashMap;

use lazy_static::lazy_static;

lazy_static! {
    /// How much a shell is preferred by its base name, unknown shells rank `0` and never get picked
    static ref SHELL_PRIORITIES: HashMap<&'static str, u32> =
        HashMap::from([("zsh", 4), ("bash", 3), ("ksh", 2), ("sh", 1)]);
}

/// Extracts the shells listed in the contents of a container's `/etc/shells`
///
/// Only absolute paths count, which also drops comments and blank lines.
/// # Arguments
/// * `contents` - The contents of `/etc/shells`
pub fn parse_shells(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|l| l.starts_with('/'))
        .map(str::to_string)
        .collect()
}

/// Returns the priority of the shell at `path` inside a container
pub fn shell_priority(path: &str) -> u32 {
    let name = path.rsplit('/').next().unwrap_or(path);
    SHELL_PRIORITIES.get(name).copied().unwrap_or(0)
}

/// Selects the most preferred shell, the first one listed wins a tie
/// # Arguments
/// * `shells` - The absolute paths of the available shells
/// # Returns
/// `None` if none of the shells is known
pub fn select_shell(shells: &[String]) -> Option<&str> {
    let mut best: Option<(&str, u32)> = None;

    for shell in shells {
        let prio = shell_priority(shell);
        if prio > best.map(|b| b.1).unwrap_or(0) {
            best = Some((shell.as_str(), prio));
        }
    }

    best.map(|b| b.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn etc_shells_keeps_absolute_paths_only() {
        let contents = "# /etc/shells: valid login shells\n/bin/sh\n  /bin/bash \n\nrbash\n";
        assert_eq!(parse_shells(contents), vec!["/bin/sh", "/bin/bash"]);
    }

    #[test]
    fn the_most_preferred_shell_wins() {
        let shells = parse_shells("/bin/sh\n/bin/bash\n/usr/bin/zsh\n/bin/ksh\n");
        assert_eq!(select_shell(&shells), Some("/usr/bin/zsh"));
    }

    #[test]
    fn ties_go_to_the_first_listed_shell() {
        let shells = parse_shells("/bin/bash\n/usr/bin/bash\n");
        assert_eq!(select_shell(&shells), Some("/bin/bash"));
    }

    #[test]
    fn unknown_shells_are_never_selected() {
        let shells = parse_shells("/bin/fish\n/usr/bin/nu\n");
        assert_eq!(select_shell(&shells), None);
        assert_eq!(select_shell(&[]), None);
    }
}
