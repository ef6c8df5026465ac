use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

/// Error kinds for minimongo operations.
///
/// Every failure raised by the collection engine, the registry or the snapshot
/// layer carries exactly one of these kinds, so callers can match on the
/// category without parsing messages.
///
/// # Examples
///
/// ```rust,ignore
/// use minimongo::errors::{MongoError, ErrorKind, MongoResult};
///
/// fn example() -> MongoResult<()> {
///     Err(MongoError::new("No document with that id", ErrorKind::NotFound))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    // Identity Errors
    /// An identifier is already reserved in the collection
    DuplicateKey,
    /// The requested document, collection or index does not exist
    NotFound,

    // Argument Errors
    /// An argument is malformed (empty or reserved field name, bad hex id, ...)
    InvalidArgument,
    /// A value of the wrong type was supplied where an identifier is required
    TypeMismatch,

    // IO Errors
    /// Generic IO error
    IOError,
    /// The snapshot file was not found
    FileNotFound,
    /// The snapshot file exists and overwriting was not requested
    FileAlreadyExists,
    /// Permission denied for file operation
    PermissionDenied,

    // Snapshot Errors
    /// A snapshot could not be encoded or decoded
    EncodingError,

    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::DuplicateKey => write!(f, "Duplicate key"),
            ErrorKind::NotFound => write!(f, "Not found"),
            ErrorKind::InvalidArgument => write!(f, "Invalid argument"),
            ErrorKind::TypeMismatch => write!(f, "Type mismatch"),
            ErrorKind::IOError => write!(f, "IO error"),
            ErrorKind::FileNotFound => write!(f, "File not found"),
            ErrorKind::FileAlreadyExists => write!(f, "File already exists"),
            ErrorKind::PermissionDenied => write!(f, "Permission denied"),
            ErrorKind::EncodingError => write!(f, "Encoding error"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// The error type of minimongo.
///
/// `MongoError` carries a message, an [ErrorKind], an optional cause and an
/// unresolved backtrace captured at construction. Symbols are only resolved
/// when the error is debug-printed.
#[derive(Clone)]
pub struct MongoError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<MongoError>>,
    backtrace: Backtrace,
}

impl MongoError {
    /// Creates a new `MongoError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        MongoError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: Backtrace::new_unresolved(),
        }
    }

    /// Creates a new `MongoError` chained onto the error that caused it.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: MongoError) -> Self {
        MongoError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: Backtrace::new_unresolved(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&MongoError> {
        self.cause.as_deref()
    }
}

impl Display for MongoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for MongoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}: {}\nCaused by: {:?}", self.error_kind, self.message, cause),
            None => {
                let mut backtrace = self.backtrace.clone();
                backtrace.resolve();
                write!(f, "{}: {}\n{:?}", self.error_kind, self.message, backtrace)
            }
        }
    }
}

impl Error for MongoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for minimongo operations.
pub type MongoResult<T> = Result<T, MongoError>;

impl From<std::io::Error> for MongoError {
    fn from(err: std::io::Error) -> Self {
        let error_kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            std::io::ErrorKind::AlreadyExists => ErrorKind::FileAlreadyExists,
            _ => ErrorKind::IOError,
        };
        MongoError::new(&format!("IO error: {}", err), error_kind)
    }
}

impl From<bincode::error::EncodeError> for MongoError {
    fn from(err: bincode::error::EncodeError) -> Self {
        MongoError::new(
            &format!("Snapshot encoding error: {}", err),
            ErrorKind::EncodingError,
        )
    }
}

impl From<bincode::error::DecodeError> for MongoError {
    fn from(err: bincode::error::DecodeError) -> Self {
        MongoError::new(
            &format!("Snapshot decoding error: {}", err),
            ErrorKind::EncodingError,
        )
    }
}

impl From<std::fmt::Error> for MongoError {
    fn from(err: std::fmt::Error) -> Self {
        MongoError::new(
            &format!("Formatting error: {}", err),
            ErrorKind::InternalError,
        )
    }
}
