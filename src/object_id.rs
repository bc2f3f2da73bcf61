use std::fmt;

/// Deterministic wallet object identifier.
///
/// Formed as `{issuer_id}.{sanitized_user_id}-{class_id}`, where every
/// user-id character outside `[A-Za-z0-9._-]` is replaced with `_`. The same
/// (issuer, user, class) triple always yields the same id, which is what
/// makes the get-or-create flow idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn new(issuer_id: &str, user_id: &str, class_id: &str) -> Self {
        let user_id = sanitize_user_id(user_id);
        ObjectId(format!("{issuer_id}.{user_id}-{class_id}"))
    }

    /// Wraps an id that was derived elsewhere, verbatim.
    pub fn from_raw(id: impl Into<String>) -> Self {
        ObjectId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn sanitize_user_id(user_id: &str) -> String {
    user_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
