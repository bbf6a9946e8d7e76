#[cfg(feature = "generator-rust")]
mod rust;

#[cfg(not(feature = "generator-rust"))]
compile_error!("At least one generator must be enabled");

use clap::ValueEnum;

use crate::ir::{Bindings, ClientDef};

/// One generated source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedModule {
    pub file_name: String,
    pub source: String,
}

/// Turns the target-independent description into source code of one language.
pub trait Renderer {
    /// Renders all definitions as a single module.
    fn render_bindings(&self, bindings: &Bindings) -> String;

    /// Renders the types, message wrappers and facade of a client, plus a module tying them
    /// together.
    fn render_client(&self, bindings: &Bindings, client: &ClientDef) -> Vec<RenderedModule>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Target {
    #[cfg(feature = "generator-rust")]
    Rust,
}

impl Target {
    pub fn renderer(&self) -> Box<dyn Renderer> {
        match *self {
            #[cfg(feature = "generator-rust")]
            Self::Rust => Box::new(rust::RustRenderer),
        }
    }
}
