use thiserror::Error;

pub type Result<T, E = FuzzyError> = std::result::Result<T, E>;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum FuzzyError {
    #[error("unknown variable {variable}")]
    UnknownVariable { variable: String },

    #[error("variable {variable} has no term {term}")]
    UnknownTerm { variable: String, term: String },

    #[error("unknown {kind} operator `{name}`")]
    UnknownOperator { kind: &'static str, name: String },

    #[error("unknown modifier `{name}`")]
    UnknownModifier { name: String },

    #[error("malformed rule: {reason}")]
    MalformedRule { reason: String },

    #[error("cannot aggregate zero membership arrays")]
    EmptyOperand,

    #[error("no fact supplied for premise variable {variable}")]
    MissingFact { variable: String },

    #[error("membership must be given as at least one (x, degree) point")]
    EmptyMembership,

    #[error("certainty factor {value} is outside [0, 1]")]
    InvalidCertaintyFactor { value: f64 },

    #[error("invalid universe of discourse: {reason}")]
    InvalidUniverse { reason: String },

    #[error("{kind} takes {expected} parameters, got {actual}")]
    InvalidParameters {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },
}
