//! Positive integer identifiers for users and chats.

use serde::Serialize;

/// Validation errors for identifier constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdValidationError {
    /// Zero or negative value.
    #[error("identifier must be a positive integer, got {0}")]
    NotPositive(i64),
}

macro_rules! positive_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Validate and wrap a raw identifier.
            ///
            /// # Errors
            ///
            /// Returns [`IdValidationError::NotPositive`] for zero or negative
            /// values.
            pub const fn new(raw: i64) -> Result<Self, IdValidationError> {
                if raw > 0 {
                    Ok(Self(raw))
                } else {
                    Err(IdValidationError::NotPositive(raw))
                }
            }

            /// Raw integer value.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl TryFrom<i64> for $name {
            type Error = IdValidationError;

            fn try_from(raw: i64) -> Result<Self, Self::Error> {
                Self::new(raw)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

positive_id! {
    /// Identifier of a user as issued by the identity service.
    ///
    /// # Examples
    /// ```
    /// use gateway::domain::UserId;
    ///
    /// assert_eq!(UserId::new(42).map(UserId::get), Ok(42));
    /// assert!(UserId::new(0).is_err());
    /// ```
    UserId
}

positive_id! {
    /// Identifier of a chat owned by exactly one user.
    ChatId
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0)]
    #[case(-1)]
    #[case(i64::MIN)]
    fn rejects_non_positive(#[case] raw: i64) {
        assert_eq!(ChatId::new(raw), Err(IdValidationError::NotPositive(raw)));
        assert!(UserId::try_from(raw).is_err());
    }

    #[test]
    fn serialises_as_bare_integer() {
        let id = UserId::new(7).expect("positive id");
        assert_eq!(serde_json::to_string(&id).expect("serialise"), "7");
    }
}
