//! Status dispatch: turning a raw response into a typed outcome.
//!
//! Every operation accepts a small set of statuses and maps each of them to a
//! value, an absence or a typed error. The rules are shared by all resource
//! clients:
//!
//! | Operation | 200 / 201 | 404 | 409 | other |
//! |---|---|---|---|---|
//! | list | items | empty | error | error |
//! | get | `Some` | `None` | error | error |
//! | create / update | record | error | error | error |
//! | strict delete | ok (200 only) | error | error | error |
//! | legacy delete | ok | `NotFound` | `Conflict` | ok |

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::transport::ApiResponse;

impl ApiResponse {
    /// Interprets a list response.
    ///
    /// With `field = None` the body is a top-level array; otherwise the items
    /// are read from that field of a JSON object, and a missing or null field
    /// means no items.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedResponse`] for any status other than 200 or
    /// 404, and a serialization error for malformed bodies.
    pub fn into_list<T: DeserializeOwned>(self, field: Option<&str>) -> Result<Vec<T>> {
        match self.status {
            200 => {
                if self.body.trim().is_empty() {
                    return Ok(Vec::new());
                }
                match field {
                    None => self.json(),
                    Some(field) => {
                        let mut document: Value = self.json()?;
                        match document.get_mut(field).map(Value::take) {
                            None | Some(Value::Null) => Ok(Vec::new()),
                            Some(items) => serde_json::from_value(items).map_err(|e| {
                                Error::serialization(format!(
                                    "failed to decode `{field}` from {}: {e}",
                                    self.url
                                ))
                            }),
                        }
                    }
                }
            }
            404 => Ok(Vec::new()),
            _ => Err(Error::unexpected(&self)),
        }
    }

    /// Interprets a single-record lookup: 200 is `Some`, 404 is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedResponse`] for any other status.
    pub fn into_optional<T: DeserializeOwned>(self) -> Result<Option<T>> {
        match self.status {
            200 => self.json().map(Some),
            404 => Ok(None),
            _ => Err(Error::unexpected(&self)),
        }
    }

    /// Parses the body as a record when the status is `success`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedResponse`] for any other status.
    pub fn into_record<T: DeserializeOwned>(self, success: u16) -> Result<T> {
        self.into_record_any(&[success])
    }

    /// Parses the body as a record when the status is any of `accepted`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedResponse`] for any other status.
    pub fn into_record_any<T: DeserializeOwned>(self, accepted: &[u16]) -> Result<T> {
        if accepted.contains(&self.status) {
            self.json()
        } else {
            Err(Error::unexpected(&self))
        }
    }

    /// Checks that the status is `success` and discards the body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedResponse`] for any other status.
    pub fn expect_status(self, success: u16) -> Result<()> {
        if self.status == success {
            Ok(())
        } else {
            Err(Error::unexpected(&self))
        }
    }
}

/// How a resource type interprets delete responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Only 200 is success.
    Strict,
    /// 404 and 409 are typed errors; every other status counts as success.
    Legacy,
}

impl DeletePolicy {
    /// Applies the policy to a delete response for `resource_type` `id`.
    ///
    /// # Errors
    ///
    /// Strict: [`Error::UnexpectedResponse`] for anything but 200.
    /// Legacy: [`Error::NotFound`] on 404 and [`Error::Conflict`] on 409.
    pub fn check(
        self,
        response: ApiResponse,
        resource_type: &'static str,
        id: impl std::fmt::Display,
    ) -> Result<()> {
        match self {
            Self::Strict => response.expect_status(200),
            Self::Legacy => match response.status {
                404 => Err(Error::not_found(resource_type, id)),
                409 => Err(Error::Conflict {
                    body: response.body,
                }),
                _ => Ok(()),
            },
        }
    }
}
