/// Result of a controller operation
///
/// Transports render `Ok` as 200, `Created` as 201 and `NotFound` as 404
/// with an empty body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Ok(T),
    Created(T),
    NotFound,
}

impl<T> Outcome<T> {
    /// `Ok(value)` when present, `NotFound` otherwise
    pub fn found(value: Option<T>) -> Self {
        match value {
            Some(value) => Outcome::Ok(value),
            None => Outcome::NotFound,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Outcome::NotFound)
    }

    /// Borrow the payload of `Ok` or `Created`
    pub fn payload(&self) -> Option<&T> {
        match self {
            Outcome::Ok(value) | Outcome::Created(value) => Some(value),
            Outcome::NotFound => None,
        }
    }

    pub fn into_payload(self) -> Option<T> {
        match self {
            Outcome::Ok(value) | Outcome::Created(value) => Some(value),
            Outcome::NotFound => None,
        }
    }

    /// Short label for logs
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Ok(_) => "ok",
            Outcome::Created(_) => "created",
            Outcome::NotFound => "not_found",
        }
    }
}
