// Pure syntax checks shared by the stores. No side effects; every
// function is total over arbitrary string input.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap();
    // 10-15 digits, no leading zero after the optional +
    static ref PHONE_RE: Regex = Regex::new(r"^\+?[1-9]\d{9,14}$").unwrap();
    static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_-]{3,30}$").unwrap();
}

/// Maximum bio length, counted in whitespace-separated words.
pub const BIO_MAX_WORDS: usize = 150;

pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Strips everything that is not a digit or `+` (spaces, dashes, parens).
pub fn normalize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Validates the normalized form; callers store the normalized string.
pub fn validate_phone(phone: &str) -> bool {
    PHONE_RE.is_match(&normalize_phone(phone))
}

/// Case-insensitive; the stores persist usernames lowercased.
pub fn validate_username(username: &str) -> bool {
    USERNAME_RE.is_match(username)
}

pub fn bio_word_count(bio: &str) -> usize {
    bio.split_whitespace().count()
}

pub fn validate_bio(bio: &str) -> bool {
    bio_word_count(bio) <= BIO_MAX_WORDS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails_accepted() {
        assert!(validate_email("user@example.com"));
        assert!(validate_email("first.last+tag@sub.domain.org"));
        assert!(validate_email("UPPER_case%99@host.io"));
    }

    #[test]
    fn test_invalid_emails_rejected() {
        assert!(!validate_email("no-at-sign.com"));
        assert!(!validate_email("user@no-tld"));
        assert!(!validate_email("user@.com"));
        assert!(!validate_email("user@domain.c")); // TLD too short
        assert!(!validate_email(""));
    }

    #[test]
    fn test_phone_normalization_strips_formatting() {
        assert_eq!(normalize_phone("+1 (555) 123-4567"), "+15551234567");
        assert_eq!(normalize_phone("91 98765-43210"), "919876543210");
    }

    #[test]
    fn test_formatted_phone_accepted_after_cleaning() {
        // 11 digits after the +, inside the 10-15 range
        assert!(validate_phone("+1 (555) 123-4567"));
        assert!(validate_phone("9876543210"));
    }

    #[test]
    fn test_bad_phones_rejected() {
        assert!(!validate_phone("0123456789")); // leading zero
        assert!(!validate_phone("123456")); // too short
        assert!(!validate_phone("+1234567890123456")); // 16 digits
        assert!(!validate_phone("not-a-phone"));
    }

    #[test]
    fn test_username_length_bounds() {
        assert!(!validate_username("ab")); // 2 chars
        assert!(validate_username("abc")); // 3 chars
        assert!(validate_username(&"a".repeat(30)));
        assert!(!validate_username(&"a".repeat(31)));
    }

    #[test]
    fn test_username_charset() {
        assert!(validate_username("joe_doe-99"));
        assert!(validate_username("JoeDoe")); // case-insensitive match, stored lowercased
        assert!(!validate_username("a!b"));
        assert!(!validate_username("joe doe"));
    }

    #[test]
    fn test_bio_counts_words_not_characters() {
        let long_word = "x".repeat(500);
        assert!(validate_bio(&long_word)); // one giant word is still one word

        let exactly_limit = vec!["word"; BIO_MAX_WORDS].join(" ");
        assert!(validate_bio(&exactly_limit));

        let over_limit = vec!["word"; BIO_MAX_WORDS + 1].join(" ");
        assert!(!validate_bio(&over_limit));
    }
}
