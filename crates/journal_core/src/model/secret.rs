//! Password gate decorator.
//!
//! # Responsibility
//! - Hide inner content behind a password until verified in this session.
//!
//! # Invariants
//! - Only the SHA-256 hex digest of the password is kept.
//! - Locking gates reads only; edits always reach the inner source.
//! - Verification never mutates the stored digest.

use crate::model::source::{ContentSource, EntryDescription, SourceResult};
use crate::model::multilingual::MultilingualEntry;
use log::{debug, info};
use sha2::{Digest, Sha256};

/// Content returned while a `SecretEntry` is locked.
pub const LOCK_SENTINEL: &str = "******** [LOCKED] ********";

/// Returns the lowercase hex SHA-256 digest of `password`.
pub fn hash_password(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

/// Decorator that gates reads behind a password.
pub struct SecretEntry {
    inner: Box<dyn ContentSource>,
    password_hash: String,
    locked: bool,
}

impl SecretEntry {
    /// Wraps `inner`, keeping only the digest of `password`. Starts locked.
    pub fn new(inner: Box<dyn ContentSource>, password: &str) -> Self {
        Self::with_digest(inner, hash_password(password))
    }

    /// Rebuilds a locked layer from a previously stored digest.
    pub fn with_digest(inner: Box<dyn ContentSource>, password_hash: impl Into<String>) -> Self {
        Self {
            inner,
            password_hash: password_hash.into(),
            locked: true,
        }
    }

    /// Unlocks the layer when `password` matches. Unlimited attempts.
    pub fn verify(&mut self, password: &str) -> bool {
        if hash_password(password) == self.password_hash {
            self.locked = false;
            info!("event=secret_verify module=model status=ok");
            return true;
        }
        debug!("event=secret_verify module=model status=rejected");
        false
    }

    /// Replaces the digest with one for `password` and locks the layer.
    pub fn reset_password(&mut self, password: &str) {
        self.password_hash = hash_password(password);
        self.locked = true;
    }

    /// Locks the layer again.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn inner(&self) -> &dyn ContentSource {
        self.inner.as_ref()
    }

    pub fn into_inner(self) -> Box<dyn ContentSource> {
        self.inner
    }
}

impl ContentSource for SecretEntry {
    fn content(&self) -> String {
        if self.locked {
            return LOCK_SENTINEL.to_string();
        }
        self.inner.content()
    }

    fn edit_content(&mut self, text: &str) -> SourceResult<()> {
        self.inner.edit_content(text)
    }

    fn describe(&self) -> EntryDescription {
        let mut description = self.inner.describe();
        description.encrypted = true;
        description
    }

    fn retitle(&mut self, title: &str) {
        self.inner.retitle(title);
    }

    fn secret_layer(&self) -> Option<&SecretEntry> {
        Some(self)
    }

    fn secret_layer_mut(&mut self) -> Option<&mut SecretEntry> {
        Some(self)
    }

    fn multilingual_layer(&self) -> Option<&MultilingualEntry> {
        self.inner.multilingual_layer()
    }

    fn multilingual_layer_mut(&mut self) -> Option<&mut MultilingualEntry> {
        self.inner.multilingual_layer_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::{hash_password, SecretEntry, LOCK_SENTINEL};
    use crate::model::source::{ContentSource, TextSource};

    fn secret(password: &str) -> SecretEntry {
        SecretEntry::new(Box::new(TextSource::new("Secret", "Hidden content")), password)
    }

    #[test]
    fn digest_is_sha256_hex() {
        assert_eq!(
            hash_password("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn starts_locked_and_hides_content() {
        let entry = secret("mypassword");
        assert!(entry.is_locked());
        assert_eq!(entry.content(), LOCK_SENTINEL);
        assert_ne!(entry.password_hash(), "mypassword");
    }

    #[test]
    fn wrong_password_keeps_lock_and_digest() {
        let mut entry = secret("mypassword");
        let digest = entry.password_hash().to_string();

        for _ in 0..5 {
            assert!(!entry.verify("wrongpass"));
        }
        assert!(entry.is_locked());
        assert_eq!(entry.content(), LOCK_SENTINEL);
        assert_eq!(entry.password_hash(), digest);

        assert!(entry.verify("mypassword"));
        assert_eq!(entry.content(), "Hidden content");
        assert_eq!(entry.password_hash(), digest);
    }

    #[test]
    fn edits_pass_through_while_locked() {
        let mut entry = secret("pw");
        entry.edit_content("rewritten").unwrap();
        assert_eq!(entry.content(), LOCK_SENTINEL);
        assert!(entry.verify("pw"));
        assert_eq!(entry.content(), "rewritten");
    }

    #[test]
    fn relock_hides_content_again() {
        let mut entry = secret("pw");
        assert!(entry.verify("pw"));
        entry.lock();
        assert_eq!(entry.content(), LOCK_SENTINEL);
    }

    #[test]
    fn describe_marks_encrypted() {
        let entry = secret("pw");
        let description = entry.describe();
        assert!(description.encrypted);
        assert_eq!(description.title, "Secret");
    }
}
