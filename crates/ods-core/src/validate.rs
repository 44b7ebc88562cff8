//! Shared validation helpers for inbound payloads.
//!
//! Payload types derive [`validator::Validate`]; the helpers here are the
//! custom rules they reference plus the single entry point used by callers.

use std::borrow::Cow;

use validator::{Validate, ValidationError};

use crate::Result;

/// Run the payload's validation rules, returning it unchanged on success.
pub fn validated<T: Validate>(payload: T) -> Result<T> {
  payload.validate()?;
  Ok(payload)
}

/// Reject strings that are empty or consist only of whitespace.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
  if value.trim().is_empty() {
    return Err(invalid("blank", "must not be blank"));
  }
  Ok(())
}

/// [`not_blank`] for any string-backed id.
pub fn id_not_blank<I: AsRef<str>>(id: &I) -> Result<(), ValidationError> {
  not_blank(id.as_ref())
}

pub(crate) fn invalid(
  code: &'static str,
  message: impl Into<Cow<'static, str>>,
) -> ValidationError {
  let mut err = ValidationError::new(code);
  err.message = Some(message.into());
  err
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn not_blank_rejects_whitespace() {
    assert!(not_blank("Widget").is_ok());
    assert!(not_blank("").is_err());
    assert!(not_blank("  \t").is_err());
  }
}
