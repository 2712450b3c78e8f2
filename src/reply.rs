//! POLYKV - Replies
//! Maps service results onto transport-neutral status codes and bodies.
//!
//! Declined outcomes become `NoContent`; raised errors become
//! `InternalServerError` carrying the error message.

use std::fmt;

use crate::engine::service::Service;
use crate::error::StoreError;
use crate::types::{DataType, Entry, Key};

/// Status of a reply, numbered like its HTTP counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Created,
    NoContent,
    InternalServerError,
}

impl Status {
    /// Numeric status code.
    pub fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::Created => 201,
            Status::NoContent => 204,
            Status::InternalServerError => 500,
        }
    }
}

/// Outcome of one request: a status and a plain-text body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: Status,
    pub body: String,
}

impl Reply {
    fn new(status: Status, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    fn no_content() -> Self {
        Self::new(Status::NoContent, String::new())
    }
}

impl From<StoreError> for Reply {
    fn from(err: StoreError) -> Self {
        Self::new(Status::InternalServerError, err.to_string())
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.body.is_empty() {
            write!(f, "[{}]", self.status.code())
        } else {
            write!(f, "[{}] {}", self.status.code(), self.body)
        }
    }
}

/// Look up `key` and reply with its string value.
pub fn get<S: Service>(service: &S, db: u16, key: &str) -> Reply {
    match service.get(db, &Key::new(key)) {
        Ok(Some(entry)) => Reply::new(Status::Ok, entry.get_string()),
        Ok(None) => Reply::no_content(),
        Err(e) => e.into(),
    }
}

/// Store `value` as a string entry under `key`.
pub fn set<S: Service>(service: &S, db: u16, key: &str, value: &str) -> Reply {
    let key = Key::with_type(key, DataType::String);
    match service.set(db, key, Entry::string(value)) {
        Ok(entry) => Reply::new(Status::Created, entry.get_string()),
        Err(e) => e.into(),
    }
}

/// Delete `key`.
pub fn delete<S: Service>(service: &S, db: u16, key: &str) -> Reply {
    match service.delete(db, &Key::new(key)) {
        Ok(true) => Reply::new(Status::Ok, String::new()),
        Ok(false) => Reply::no_content(),
        Err(e) => e.into(),
    }
}
