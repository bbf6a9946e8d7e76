use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::generators::Target;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, global = true, help = "Allow a XML Document Type Definition (DTD) to occur")]
    pub allow_dtd: bool,

    #[arg(long, global = true, value_enum, default_value = "rust")]
    pub target: Target,

    #[arg(short, long, global = true, help = "Log debug output unless RUST_LOG says otherwise")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate the types of a schema as a single module
    GenerateBindings {
        #[command(flatten)]
        source: SourceKind,

        #[arg(help = "The source file or URL")]
        input: String,

        #[arg(help = "The module to write")]
        output: PathBuf,

        #[arg(
            long,
            value_name = "NAME",
            help = "Only generate declarations with this local name, and what they refer to"
        )]
        only: Vec<String>,
    },
    /// Generate types, message wrappers and a client facade for a WSDL service
    GenerateClient {
        #[arg(help = "The WSDL file or URL")]
        input: String,

        #[arg(help = "The directory the client modules are written to")]
        output_dir: PathBuf,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct SourceKind {
    #[arg(long, help = "Read the types section of a WSDL document")]
    pub from_wsdl: bool,

    #[arg(long, help = "Read a schema document")]
    pub from_xsd: bool,
}
