mod bindings;
mod cli;
mod client;
mod error;
mod generators;
mod ir;
mod naming;
mod registry;

use std::{error::Error, fs, path::Path, process::ExitCode};

use clap::Parser;
use log::{error, info, LevelFilter};

use st_xsd::{load_schema, load_wsdl, LoadOptions, Named, UriFetcher};

use cli::{Cli, Command};
use error::GenerateError;

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::new();
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    // RUST_LOG wins over --verbose
    builder.parse_default_env().init();
}

fn write(path: &Path, source: &str) -> Result<(), GenerateError> {
    fs::write(path, source).map_err(|source| GenerateError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("wrote {}", path.display());
    Ok(())
}

fn run(cli: Cli) -> Result<(), GenerateError> {
    let fetcher = UriFetcher;
    let options = LoadOptions {
        allow_dtd: cli.allow_dtd,
    };
    let renderer = cli.target.renderer();

    match cli.command {
        Command::GenerateBindings {
            source,
            input,
            output,
            only,
        } => {
            let declarations = if source.from_wsdl {
                load_wsdl(&input, &fetcher, options)?.types
            } else {
                load_schema(&input, &fetcher, options)?
            };
            let bindings = if only.is_empty() {
                bindings::generate_bindings(&declarations)?
            } else {
                let selected = declarations
                    .iter()
                    .filter(|d| only.iter().any(|name| name == d.name()));
                bindings::generate_selected(&declarations, selected)?
            };
            write(&output, &renderer.render_bindings(&bindings))
        }
        Command::GenerateClient { input, output_dir } => {
            let wsdl = load_wsdl(&input, &fetcher, options)?;
            let (bindings, client) = client::generate_client(&wsdl)?;
            let modules = renderer.render_client(&bindings, &client);
            fs::create_dir_all(&output_dir).map_err(|source| GenerateError::Io {
                path: output_dir.clone(),
                source,
            })?;
            for module in modules {
                write(&output_dir.join(&module.file_name), &module.source)?;
            }
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            let mut source = e.source();
            while let Some(cause) = source {
                error!("caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
