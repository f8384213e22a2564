use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for mockgen operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Broad failure classes. Every one of them is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An interface, package or declaration could not be found or read.
    Resolution,
    /// A type shape the generator cannot express.
    Construction,
    /// Mock source text did not have the expected block layout.
    StructuralExtraction,
    /// The formatting pass rejected the generated source.
    Formatting,
    /// Reading, creating or writing files failed.
    Filesystem,
    /// `mockgen.toml` is malformed.
    Config,
}

/// Source context for error reporting.
///
/// Encapsulates the source content and filename, reducing parameter passing
/// in error factory functions.
///
/// # Example
///
/// ```ignore
/// let ctx = SourceContext::new(content, "examplemock/testmock.go");
/// ctx.extraction_error("missing mock struct", None);
/// ```
#[derive(Debug, Clone)]
pub struct SourceContext {
    src: String,
    filename: String,
}

impl SourceContext {
    /// Create a new source context.
    pub fn new(src: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            filename: filename.into(),
        }
    }

    /// Get the source content.
    pub fn src(&self) -> &str {
        &self.src
    }

    /// Get the filename.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Create a NamedSource for miette error reporting.
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.filename, self.src.clone())
    }

    /// Create a structural extraction error.
    pub fn extraction_error(
        &self,
        message: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::Extraction {
            src: self.named_source(),
            span,
            message: message.into(),
        })
    }

    /// Create a syntax error for a source file handed to a resolver.
    pub fn syntax_error(
        &self,
        message: impl Into<String>,
        span: impl Into<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::Syntax {
            src: self.named_source(),
            span: span.into(),
            message: message.into(),
        })
    }

    /// Create a config parse error from a toml error.
    pub fn config_error(&self, source: toml::de::Error) -> Box<Error> {
        let span = source.span().map(SourceSpan::from);
        Box::new(Error::Config {
            src: self.named_source(),
            span,
            source,
        })
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("'{name}' not found in {location}")]
    #[diagnostic(
        code(mockgen::resolution),
        help("the name must be an interface or function type declared in that package")
    )]
    NotFound { name: String, location: String },

    #[error("{message}")]
    #[diagnostic(code(mockgen::resolution))]
    Resolution { message: String },

    #[error("{message}")]
    #[diagnostic(code(mockgen::resolution::syntax))]
    Syntax {
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
        message: String,
    },

    #[error("cannot construct mock: {message}")]
    #[diagnostic(
        code(mockgen::construction),
        help("the mock generator does not support this type shape")
    )]
    Construction { message: String },

    #[error("{message}")]
    #[diagnostic(
        code(mockgen::extraction),
        help(
            "a mock file must keep its generated layout: the mock struct first, then one method per block, each ending with a closing brace on its own line"
        )
    )]
    Extraction {
        #[source_code]
        src: NamedSource<String>,
        #[label("unexpected content")]
        span: Option<SourceSpan>,
        message: String,
    },

    #[error("generated source was rejected by the formatter: {message}")]
    #[diagnostic(code(mockgen::format))]
    Format {
        message: String,
        /// The unformatted source, kept for diagnostics.
        raw: String,
    },

    #[error("failed to {action} '{path}'")]
    #[diagnostic(code(mockgen::io))]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file '{path}' already exists")]
    #[diagnostic(
        code(mockgen::io::exists),
        help("delete it before re-generating it, or run 'mockgen update' to merge")
    )]
    AlreadyExists { path: PathBuf },

    #[error("no mock of '{qualified}' found under '{dir}'")]
    #[diagnostic(
        code(mockgen::discovery),
        help("run 'mockgen generate' first to create the mock")
    )]
    MockNotFound { qualified: String, dir: PathBuf },

    #[error("{} files under '{dir}' mock '{qualified}'", .candidates.len())]
    #[diagnostic(
        code(mockgen::discovery::ambiguous),
        help("keep exactly one mock file per interface")
    )]
    AmbiguousMock {
        qualified: String,
        dir: PathBuf,
        candidates: Vec<PathBuf>,
    },

    #[error("failed to parse mockgen.toml")]
    #[diagnostic(code(mockgen::config))]
    Config {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },
}

impl Error {
    /// Create a resolution error.
    pub fn resolution(message: impl Into<String>) -> Box<Self> {
        Box::new(Self::Resolution {
            message: message.into(),
        })
    }

    /// Create a not-found error.
    pub fn not_found(name: impl Into<String>, location: impl Into<String>) -> Box<Self> {
        Box::new(Self::NotFound {
            name: name.into(),
            location: location.into(),
        })
    }

    /// Create a construction error.
    pub fn construction(message: impl Into<String>) -> Box<Self> {
        Box::new(Self::Construction {
            message: message.into(),
        })
    }

    /// Create a formatting error carrying the rejected source.
    pub fn format(message: impl Into<String>, raw: impl Into<String>) -> Box<Self> {
        Box::new(Self::Format {
            message: message.into(),
            raw: raw.into(),
        })
    }

    /// Create a filesystem error.
    pub fn io(
        action: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Box<Self> {
        Box::new(Self::Io {
            action,
            path: path.into(),
            source,
        })
    }

    /// The failure class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } | Self::Resolution { .. } | Self::Syntax { .. } => {
                ErrorKind::Resolution
            }
            Self::Construction { .. } => ErrorKind::Construction,
            Self::Extraction { .. } => ErrorKind::StructuralExtraction,
            Self::Format { .. } => ErrorKind::Formatting,
            Self::Io { .. }
            | Self::AlreadyExists { .. }
            | Self::MockNotFound { .. }
            | Self::AmbiguousMock { .. } => ErrorKind::Filesystem,
            Self::Config { .. } => ErrorKind::Config,
        }
    }
}
