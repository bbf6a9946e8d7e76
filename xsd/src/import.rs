use std::{collections::HashMap, fs, io, path::Path};

use roxmltree::{Document, Node, ParsingOptions};
use thiserror::Error;
use url::Url;

use super::{error::XsdError, values::attribute_value, xml::required_attribute};

/// This structure represents the `import` element; it is not a declaration.
///
/// Note that an import is allowed to have neither a `schemaLocation` nor a `namespace` attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Import {
    pub namespace: Option<String>,
    pub schema_location: Option<String>,
}

impl Import {
    pub const TAG_NAME: &'static str = "import";

    pub fn map_from_xml(import: Node) -> Result<Self, XsdError> {
        Ok(Import {
            namespace: attribute_value(import, "namespace")?,
            schema_location: attribute_value(import, "schemaLocation")?,
        })
    }
}

/// The `include` element. Unlike an import, its location is mandatory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Include {
    pub schema_location: String,
}

impl Include {
    pub const TAG_NAME: &'static str = "include";

    pub fn map_from_xml(include: Node) -> Result<Self, XsdError> {
        Ok(Include {
            schema_location: required_attribute(include, "schemaLocation")?.to_string(),
        })
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("{0} is neither a URL nor an existing file")]
    NotFound(String),
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("import of namespace {namespace:?} has no schemaLocation")]
    MissingLocation { namespace: Option<String> },
    #[error("import of {location} failed")]
    Fetch {
        location: String,
        #[source]
        source: FetchError,
    },
    #[error("imported document {location} is not well-formed XML")]
    Xml {
        location: String,
        #[source]
        source: roxmltree::Error,
    },
}

/// Retrieves the text of a document given its location.
pub trait SchemaFetcher {
    fn fetch(&self, uri: &str) -> Result<String, FetchError>;
}

/// Fetches `http`/`https` URLs over the network and everything else from the filesystem.
#[derive(Copy, Clone, Debug, Default)]
pub struct UriFetcher;

impl SchemaFetcher for UriFetcher {
    fn fetch(&self, uri: &str) -> Result<String, FetchError> {
        if let Ok(url) = Url::parse(uri) {
            match url.scheme() {
                "http" | "https" => {
                    log::debug!("fetching {url}");
                    let response = reqwest::blocking::get(url)?.error_for_status()?;
                    return Ok(response.text()?);
                }
                "file" => {
                    if let Ok(path) = url.to_file_path() {
                        return read_file(uri, &path);
                    }
                }
                _ => {}
            }
        }
        let path = Path::new(uri);
        if path.is_file() {
            read_file(uri, path)
        } else {
            Err(FetchError::NotFound(uri.to_string()))
        }
    }
}

fn read_file(uri: &str, path: &Path) -> Result<String, FetchError> {
    log::debug!("reading {}", path.display());
    fs::read_to_string(path).map_err(|source| FetchError::Io {
        path: uri.to_string(),
        source,
    })
}

/// Serves documents from memory, keyed by location.
#[derive(Clone, Debug, Default)]
pub struct MemoryFetcher {
    documents: HashMap<String, String>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, location: impl Into<String>, document: impl Into<String>) -> Self {
        self.documents.insert(location.into(), document.into());
        self
    }
}

impl SchemaFetcher for MemoryFetcher {
    fn fetch(&self, uri: &str) -> Result<String, FetchError> {
        self.documents
            .get(uri)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(uri.to_string()))
    }
}

/// Options applied to every document read during a run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub allow_dtd: bool,
}

impl LoadOptions {
    pub fn parse<'input>(&self, text: &'input str) -> Result<Document<'input>, roxmltree::Error> {
        let mut options = ParsingOptions::default();
        options.allow_dtd = self.allow_dtd;
        Document::parse_with_options(text, options)
    }
}
