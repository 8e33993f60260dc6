use super::{Error, ErrorExt, ErrorType};

impl<T> ErrorExt<T> for Result<T, std::io::Error> {
    fn e_context<F: Fn() -> String>(self, context: F) -> Result<T, Error> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(Error::new_context(ErrorType::IO(e), context())),
        }
    }
}

/// A TOML error
#[derive(Debug)]
pub enum TOMLError {
    /// Deserialization errors
    Deserialize(toml::de::Error),
}

impl std::fmt::Display for TOMLError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deserialize(e) => write!(f, "Deserialization error: {e}"),
        }
    }
}

impl<T> ErrorExt<T> for Result<T, toml::de::Error> {
    fn e_context<F: Fn() -> String>(self, context: F) -> Result<T, Error> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(Error::new_context(
                ErrorType::TOML(TOMLError::Deserialize(e)),
                context(),
            )),
        }
    }
}
