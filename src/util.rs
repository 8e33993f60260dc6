//! Various utility functions, structs and traits

pub mod parse;
pub mod signal;
pub mod string;
