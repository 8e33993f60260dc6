use std::{
    collections::BTreeMap,
    io::{BufRead, Write},
};

use crate::error::{Error, ErrorExt, Throwable};

use super::{Container, DockerError};

/// Renders `n` in base 36 using lowercase letters: `1`..`9`, `a`..`z`, `10`..
pub fn to_base36(mut n: usize) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    let mut digits = Vec::new();
    loop {
        digits.push(DIGITS[n % 36]);
        n /= 36;
        if n == 0 {
            break;
        }
    }
    digits.reverse();

    String::from_utf8_lossy(&digits).to_string()
}

/// Reads lines from `input` until one matches one of the `choices`
///
/// Input is trimmed and lowercased before comparing. Every mismatch prints `Invalid choice.` to `output`.
/// # Arguments
/// * `choices` - The accepted answers
/// * `input` - Where to read answers from
/// * `output` - Where to report invalid answers
/// * `prompt` - Where to print the prompt to
/// # Errors
/// If `input` ends before a valid choice has been made
pub fn read_choice<R: BufRead, W: Write, P: Write>(
    choices: &[&str],
    input: &mut R,
    output: &mut W,
    prompt: &mut P,
) -> Result<String, Error> {
    let context = || "Reading a choice".to_string();

    loop {
        write!(prompt, "> ").e_context(context)?;
        prompt.flush().e_context(context)?;

        let mut line = String::new();
        if input.read_line(&mut line).e_context(context)? == 0 {
            return Err(DockerError::NoChoice.throw(context()));
        }

        let answer = line.trim().to_lowercase();
        if choices.contains(&answer.as_str()) {
            return Ok(answer);
        }

        writeln!(output, "Invalid choice.").e_context(context)?;
    }
}

/// Lists `containers` keyed by their base 36 index and lets the user choose one
///
/// Keys are ordered as strings, so `10` is listed between `1` and `2`.
/// # Arguments
/// * `containers` - The containers to choose from
/// * `input` - Where to read the choice from
/// * `output` - Where to list the containers
/// * `prompt` - Where to print the prompt to
pub fn choose_container<'a, R: BufRead, W: Write, P: Write>(
    containers: &'a [Container],
    input: &mut R,
    output: &mut W,
    prompt: &mut P,
) -> Result<&'a Container, Error> {
    let context = || "Choosing a container".to_string();

    let choices: BTreeMap<String, &Container> = containers
        .iter()
        .enumerate()
        .map(|(i, c)| (to_base36(i + 1), c))
        .collect();

    for (key, container) in &choices {
        writeln!(output, "{}. {}", key, container).e_context(context)?;
    }

    let keys: Vec<&str> = choices.keys().map(String::as_str).collect();
    let choice = read_choice(&keys, input, output, prompt).e_context(context)?;

    match choices.get(&choice) {
        Some(container) => Ok(*container),
        None => Err(DockerError::NoChoice.throw(context())),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn containers(n: usize) -> Vec<Container> {
        (0..n)
            .map(|i| Container {
                id: format!("id{i}"),
                image: "alpine".to_string(),
                name: format!("c{i}"),
            })
            .collect()
    }

    #[test]
    fn base36_keys() {
        assert_eq!(to_base36(1), "1");
        assert_eq!(to_base36(9), "9");
        assert_eq!(to_base36(10), "a");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn invalid_answers_are_asked_again() {
        let containers = containers(2);
        let mut input = Cursor::new("7\n\n 2 \n");
        let mut output = Vec::new();
        let mut prompt = Vec::new();

        let chosen = choose_container(&containers, &mut input, &mut output, &mut prompt).unwrap();

        assert_eq!(chosen.id, "id1");
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "1. id0 alpine c0\n2. id1 alpine c1\nInvalid choice.\nInvalid choice.\n"
        );
        assert_eq!(String::from_utf8(prompt).unwrap(), "> > > ");
    }

    #[test]
    fn keys_are_case_insensitive_and_sorted_as_strings() {
        let containers = containers(11);
        let mut input = Cursor::new("A\n");
        let mut output = Vec::new();

        let chosen =
            choose_container(&containers, &mut input, &mut output, &mut std::io::sink()).unwrap();
        assert_eq!(chosen.id, "id9");

        let listing = String::from_utf8(output).unwrap();
        let keys: Vec<&str> = listing
            .lines()
            .filter_map(|l| l.split('.').next())
            .collect();
        assert_eq!(keys, vec!["1", "2", "3", "4", "5", "6", "7", "8", "9", "a", "b"]);
    }

    #[test]
    fn end_of_input_is_an_error() {
        let containers = containers(2);
        let mut input = Cursor::new("x\n");

        let err = choose_container(
            &containers,
            &mut input,
            &mut std::io::sink(),
            &mut std::io::sink(),
        )
        .unwrap_err();
        assert!(matches!(
            err.error,
            crate::error::ErrorType::Docker(DockerError::NoChoice)
        ));
    }
}
