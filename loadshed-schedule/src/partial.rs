use std::fmt;

/// A result that may be only partially valid.
///
/// Parsing steps keep going after a bad item and record what went wrong here, so a
/// caller always gets every item that could be salvaged alongside the failures.
#[derive(Debug, Clone, PartialEq)]
pub struct Partial<T, E> {
    pub value: T,
    pub errors: Vec<E>,
}

/// Every collected failure flattened into one `"; "`-joined message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct CombinedError {
    message: String,
    count: usize,
}

impl CombinedError {
    pub fn from_messages<I, S>(messages: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let messages: Vec<String> = messages
            .into_iter()
            .map(|m| m.as_ref().to_string())
            .collect();
        if messages.is_empty() {
            return None;
        }
        Some(Self {
            count: messages.len(),
            message: messages.join("; "),
        })
    }

    /// Number of individual failures folded into this error.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl<T, E> Partial<T, E> {
    pub fn new(value: T, errors: Vec<E>) -> Self {
        Self { value, errors }
    }

    pub fn ok(value: T) -> Self {
        Self {
            value,
            errors: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

impl<T, E: fmt::Display> Partial<T, E> {
    pub fn combined(&self) -> Option<CombinedError> {
        CombinedError::from_messages(self.errors.iter().map(|e| e.to_string()))
    }

    /// Strict view: any collected error discards the value.
    pub fn into_result(self) -> Result<T, CombinedError> {
        match self.combined() {
            Some(err) => Err(err),
            None => Ok(self.value),
        }
    }
}
