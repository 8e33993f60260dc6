use std::fmt::Display;

use log::warn;

/// The `--format` template making `docker ps` print one `parse_containers()` line per container
pub const PS_FORMAT: &str = "{{.ID}} {{.Image}} {{.Names}}";

/// A container as listed by `docker ps`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub id: String,
    pub image: String,
    pub name: String,
}

impl Display for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.id, self.image, self.name)
    }
}

/// Parses the output of `docker ps --format PS_FORMAT`
///
/// Every non-blank line holds the ID, image and name separated by single spaces.
/// Lines with less than three fields get skipped.
/// # Arguments
/// * `output` - The output to parse
pub fn parse_containers(output: &str) -> Vec<Container> {
    let mut containers = Vec::new();

    for line in output.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let mut parts = line.split(' ');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(id), Some(image), Some(name)) => containers.push(Container {
                id: id.to_string(),
                image: image.to_string(),
                name: name.to_string(),
            }),
            _ => warn!("Skipping malformed container line '{}'", line),
        }
    }

    containers
}
