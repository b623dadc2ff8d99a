use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = PropertyError> = core::result::Result<T, E>;

/// Every failure an evaluation can report.
///
/// All variants carry the expression being evaluated, so messages can
/// be surfaced to users without extra context.
#[derive(Debug, Error)]
pub enum PropertyError {
    /// The expression text could not be tokenized.
    #[error("syntax error in `{expression}` at offset {offset}: {message}")]
    Syntax {
        expression: Box<str>,
        offset: usize,
        message: &'static str,
    },
    /// The expression tokenized, but its atoms do not fit the object graph.
    #[error("malformed path `{expression}`: {message}")]
    MalformedPath {
        expression: Box<str>,
        message: String,
    },
    /// A name was looked up on a type that neither exposes a property
    /// nor a field with that name.
    #[error("`{expression}`: type `{type_path}` has no member named `{member}`")]
    NoSuchMember {
        expression: Box<str>,
        member: String,
        type_path: &'static str,
    },
    /// The member exists but exposes no way to read it.
    #[error("`{expression}`: member `{member}` is not readable")]
    Unreadable { expression: Box<str>, member: String },
    /// The member exists but exposes no way to write it.
    #[error("`{expression}`: member `{member}` is not writable")]
    Unwritable { expression: Box<str>, member: String },
    /// Several values were supplied for a single-valued destination.
    #[error("`{expression}`: cannot assign {count} values to single-valued `{member}`")]
    Arity {
        expression: Box<str>,
        member: String,
        count: usize,
    },
    /// A missing fixed-size array had to be created, but the next atom
    /// did not say how large it must be.
    #[error("`{expression}`: cannot create array for `{member}` without a numeric index")]
    MissingIndex { expression: Box<str>, member: String },
    /// No converter is registered for the type.
    #[error("`{expression}`: no converter registered for `{type_path}`")]
    NoConverterFound {
        expression: Box<str>,
        type_path: &'static str,
    },
    /// A converter rejected its input.
    #[error("`{expression}`: cannot convert {raw:?} to `{type_path}`: {reason}")]
    Conversion {
        expression: Box<str>,
        type_path: &'static str,
        raw: String,
        reason: String,
    },
    /// The value handed over does not match the destination type.
    #[error("`{expression}`: `{member}` expects `{expected}`, found `{found}`")]
    TypeMismatch {
        expression: Box<str>,
        member: String,
        expected: &'static str,
        found: &'static str,
    },
    /// A missing intermediate object could not be created.
    #[error("`{expression}`: cannot instantiate `{type_path}`")]
    Instantiation {
        expression: Box<str>,
        type_path: &'static str,
    },
}

impl PropertyError {
    /// Returns the expression the error was raised for.
    pub fn expression(&self) -> &str {
        match self {
            Self::Syntax { expression, .. }
            | Self::MalformedPath { expression, .. }
            | Self::NoSuchMember { expression, .. }
            | Self::Unreadable { expression, .. }
            | Self::Unwritable { expression, .. }
            | Self::Arity { expression, .. }
            | Self::MissingIndex { expression, .. }
            | Self::NoConverterFound { expression, .. }
            | Self::Conversion { expression, .. }
            | Self::TypeMismatch { expression, .. }
            | Self::Instantiation { expression, .. } => expression,
        }
    }
}
