pub mod core;

pub use self::core::{SynthesisCore, SSML_EXTENSION};
