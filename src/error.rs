use thiserror::Error;

/// Failures reported by skip list operations.
///
/// None of these leave the list in a partially modified state.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipListError {
    /// The key is not present.
    #[error("the specified key does not exist")]
    KeyNotFound,

    /// An insert-if-absent `set` found the key already present.
    #[error("the specified key already exists")]
    DuplicateKey,

    /// `min`, `max`, `pop` or `lpop` was called on an empty list.
    #[error("there are no entries in the list")]
    Empty,
}

/// Result alias used throughout the crate.
pub type Result<T, E = SkipListError> = std::result::Result<T, E>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SkipListError::KeyNotFound.to_string(),
            "the specified key does not exist"
        );
        assert_eq!(
            SkipListError::DuplicateKey.to_string(),
            "the specified key already exists"
        );
        assert_eq!(
            SkipListError::Empty.to_string(),
            "there are no entries in the list"
        );
    }
}
