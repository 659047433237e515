use thiserror::Error;

#[derive(Error, Debug)]
pub enum ObjectError {
    #[error(transparent)]
    Internal(#[from] anyhow::Error),

    #[error(
        "bad argument #{position} to '{module}.{function}' ({expected} expected, got {actual})"
    )]
    BadArgument {
        module: String,
        function: String,
        position: usize,
        expected: String,
        actual: String,
    },

    #[error(
        "too many arguments to '{module}.{function}' (no more than {max} expected, got {actual})"
    )]
    TooManyArguments {
        module: String,
        function: String,
        max: usize,
        actual: usize,
    },

    #[error("invalid argument: cannot merge {actual} into {prototype}")]
    InvalidArgument { prototype: String, actual: String },

    #[error("type error: expected {expected}, got {actual}")]
    Type { expected: String, actual: String },

    #[error("symbol not found: '{0}'")]
    LookupError(String),

    #[error("'{0}' is not callable")]
    NotCallable(String),

    #[error("cannot add or remove field '{field}' on {type_name} instance")]
    FieldSet { type_name: String, field: String },

    #[error("field '{field}' merged into the wrong partition of {type_name}")]
    FieldPartition { type_name: String, field: String },

    #[error("malformed signature '{0}'")]
    Signature(String),
}

pub type OResult<T> = Result<T, ObjectError>;
