//! Token accessor abstraction
//!
//! The client never owns or persists the bearer credential. Whatever flow
//! manages authentication supplies an accessor that yields the current
//! token; it is invoked fresh on every attempt so rotation takes effect
//! immediately.

use std::sync::Arc;

/// Caller-supplied function yielding the current bearer credential, if any.
pub type TokenAccessor = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// Accessor that always yields the same token.
pub fn static_token(token: impl Into<String>) -> TokenAccessor {
    let token = token.into();
    Arc::new(move || Some(token.clone()))
}

/// Accessor for unauthenticated use.
pub fn no_token() -> TokenAccessor {
    Arc::new(|| None)
}

/// Accessor that reads the token from an environment variable on every call.
pub fn env_token(var: &str) -> TokenAccessor {
    let var = var.to_string();
    Arc::new(move || std::env::var(&var).ok().filter(|t| !t.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_token() {
        let accessor = static_token("abc123");
        assert_eq!(accessor(), Some("abc123".to_string()));
        assert_eq!(accessor(), Some("abc123".to_string()));
    }

    #[test]
    fn test_no_token() {
        let accessor = no_token();
        assert_eq!(accessor(), None);
    }

    #[test]
    fn test_env_token_reads_fresh() {
        let var = "TRANSIT_TEST_TOKEN_FRESH";
        let accessor = env_token(var);

        std::env::remove_var(var);
        assert_eq!(accessor(), None);

        std::env::set_var(var, "rotated");
        assert_eq!(accessor(), Some("rotated".to_string()));

        std::env::remove_var(var);
    }
}
