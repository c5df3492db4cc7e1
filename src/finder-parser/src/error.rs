//! Error types for the finder compiler
//!
//! Only structural problems are errors. A name that matches no property or
//! an operator keyword that matches nothing leaves the corresponding slot
//! empty instead, so partially typed expressions still compile.

/// Structural errors raised while compiling a finder expression
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The target entity is not known to the property source
    #[error("Unknown entity '{entity}'")]
    UnknownEntity {
        /// Entity name that was requested
        entity: String,
    },

    /// `And` follows a condition that names no property
    #[error("'And' must follow a complete condition in '{fragment}'")]
    DanglingAnd {
        /// Conjunction group containing the dangling join
        fragment: String,
    },

    /// `Or` has an empty group on one side
    #[error("'Or' must join two non-empty groups in '{fragment}'")]
    DanglingOr {
        /// Filter text containing the dangling join
        fragment: String,
    },

    /// More than one sort clause
    #[error("Only one 'OrderBy' clause is allowed, found {count}")]
    MultipleOrderBy {
        /// Number of sort-clause markers found
        count: usize,
    },

    /// The sort clause follows an unfinished condition
    #[error("'OrderBy' must follow a complete condition in '{fragment}'")]
    IncompleteBeforeOrderBy {
        /// Filter text preceding the sort clause
        fragment: String,
    },

    /// `First0` / `Top0`
    #[error("Result limit must be greater than zero")]
    ZeroLimit,

    /// A result limit that does not fit in 32 bits
    #[error("Invalid result limit '{digits}'")]
    InvalidLimit {
        /// Digits as written
        digits: String,
    },

    /// A case-folding marker on a property that is not text
    #[error("Case-insensitive comparison is not supported for property '{property}' of type {type_name}")]
    IgnoreCaseNotSupported {
        /// Property spelling as written
        property: String,
        /// Declared type of the property
        type_name: String,
    },

    /// `Asc` / `Desc` without a property before it
    #[error("Sort direction '{direction}' must follow a property in '{fragment}'")]
    DirectionWithoutProperty {
        /// Direction keyword
        direction: String,
        /// Sort term containing the direction
        fragment: String,
    },
}

/// Result type for compile operations
pub type Result<T> = std::result::Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ParseError::ZeroLimit;
        assert_eq!(err.to_string(), "Result limit must be greater than zero");

        let err = ParseError::MultipleOrderBy { count: 2 };
        assert!(err.to_string().contains("found 2"));

        let err = ParseError::IgnoreCaseNotSupported {
            property: "Age".to_string(),
            type_name: "Integer".to_string(),
        };
        assert!(err.to_string().contains("'Age' of type Integer"));
    }
}
