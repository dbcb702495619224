use uuid::Uuid;

/// Generate an opaque validation token: two concatenated pseudo-random
/// substrings. Good enough for email-confirmation friction; this is not a
/// security-critical secret.
pub fn generate_validation_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_64_chars() {
        assert_eq!(generate_validation_token().len(), 64);
    }

    #[test]
    fn token_is_url_safe() {
        let token = generate_validation_token();
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn tokens_are_unique() {
        let a = generate_validation_token();
        let b = generate_validation_token();
        assert_ne!(a, b);
    }
}
