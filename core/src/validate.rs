//! Title validation.
//!
//! Lengths are counted in Unicode scalar values (`char`s), not bytes, so a
//! five-letter title in any script passes the minimum.

use crate::error::TitleError;

pub const MIN_TITLE_LEN: usize = 5;
pub const MAX_TITLE_LEN: usize = 1000;

/// Check a title against the length bounds.
///
/// Rules apply in order: empty, too short, too long.
pub fn validate_title(title: &str) -> Result<(), TitleError> {
    if title.is_empty() {
        return Err(TitleError::Empty);
    }
    let len = title.chars().count();
    if len < MIN_TITLE_LEN {
        return Err(TitleError::TooShort { len });
    }
    if len > MAX_TITLE_LEN {
        return Err(TitleError::TooLong { len });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn title(len: usize) -> String {
        "a".repeat(len)
    }

    #[test]
    fn boundaries() {
        assert_eq!(validate_title(""), Err(TitleError::Empty));
        assert_eq!(validate_title(&title(1)), Err(TitleError::TooShort { len: 1 }));
        assert_eq!(
            validate_title(&title(MIN_TITLE_LEN - 1)),
            Err(TitleError::TooShort { len: MIN_TITLE_LEN - 1 })
        );
        assert_eq!(validate_title(&title(MIN_TITLE_LEN)), Ok(()));
        assert_eq!(validate_title(&title(MAX_TITLE_LEN)), Ok(()));
        assert_eq!(
            validate_title(&title(MAX_TITLE_LEN + 1)),
            Err(TitleError::TooLong { len: MAX_TITLE_LEN + 1 })
        );
        assert_eq!(
            validate_title(&title(1_000_000)),
            Err(TitleError::TooLong { len: 1_000_000 })
        );
    }

    #[test]
    fn buy_milk_is_valid() {
        assert_eq!(validate_title("Buy milk"), Ok(()));
    }

    #[test]
    fn counts_characters_not_bytes() {
        // 5 characters, 10 bytes.
        assert_eq!(validate_title("ééééé"), Ok(()));
        // 4 characters, 16 bytes.
        assert_eq!(validate_title("🥛🥛🥛🥛"), Err(TitleError::TooShort { len: 4 }));
        // 1000 characters, 2000 bytes.
        assert_eq!(validate_title(&"é".repeat(MAX_TITLE_LEN)), Ok(()));
    }

    proptest! {
        #[test]
        fn classification_matches_length(s in "\\PC{0,1100}") {
            let len = s.chars().count();
            let result = validate_title(&s);
            match len {
                0 => prop_assert_eq!(result, Err(TitleError::Empty)),
                l if l < MIN_TITLE_LEN => prop_assert_eq!(result, Err(TitleError::TooShort { len: l })),
                l if l > MAX_TITLE_LEN => prop_assert_eq!(result, Err(TitleError::TooLong { len: l })),
                _ => prop_assert_eq!(result, Ok(())),
            }
        }
    }
}
