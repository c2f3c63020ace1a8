//! Generation outbound adapters.
//!
//! A thin HTTP implementation of the `CardGenerator` port against an
//! OpenAI-compatible structured-output endpoint.

mod dto;
mod http_generator;

pub use http_generator::{HttpCardGenerator, HttpGeneratorBuildError, HttpGeneratorConfig};
