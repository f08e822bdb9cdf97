use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// String that is zeroed on drop and never printed.
///
/// `Debug` and `Display` render `[REDACTED]`; [`expose`](Self::expose) is the
/// only way to read it.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn formatting_is_redacted() {
        let s = SecretString::new("learn-app-secret");
        assert_eq!(format!("{s:?}"), "[REDACTED]");
        assert_eq!(s.to_string(), "[REDACTED]");
        assert_eq!(s.expose(), "learn-app-secret");
    }

    #[test]
    fn clone_is_independent() {
        let a = SecretString::new("one");
        let b = a.clone();
        drop(a);
        assert_eq!(b.expose(), "one");
    }
}
