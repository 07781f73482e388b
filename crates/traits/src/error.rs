//! Error types for hash construction.
//!
//! Parameter errors are raised at construction time only; once a hasher
//! exists, updating and finalizing cannot fail.

/// A construction parameter is outside the range the algorithm accepts.
///
/// Values are never clamped or truncated: a digest computed with silently
/// adjusted parameters would not interoperate with other implementations.
///
/// # Examples
///
/// ```
/// use traits::ParamError;
///
/// fn check_key(key: &[u8]) -> Result<(), ParamError> {
///   if key.len() > 32 {
///     return Err(ParamError::KeyLength { len: key.len(), max: 32 });
///   }
///   Ok(())
/// }
///
/// assert!(check_key(&[0u8; 33]).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ParamError {
  #[error("digest length {len} is outside 1..={max}")]
  DigestLength { len: usize, max: usize },
  #[error("key length {len} exceeds {max} bytes")]
  KeyLength { len: usize, max: usize },
  #[error("salt length {len} exceeds {max} bytes")]
  SaltLength { len: usize, max: usize },
  #[error("personalization length {len} exceeds {max} bytes")]
  PersonalLength { len: usize, max: usize },
  #[error("a non-empty key is required")]
  MissingKey,
}
