//! Records bound to the client that produced them.
//!
//! Every record returned by a resource client is wrapped in a [`Bound`],
//! which pairs the plain data with a clone of its resource client. The bound
//! record can then refresh or delete itself without any global lookup. The
//! client is a capability, not an owner: dropping a bound record never
//! affects the registry's cached root clients.

use std::fmt;
use std::ops::Deref;

use async_trait::async_trait;
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};

/// A record type with an identity and a client that can look it up.
pub trait Resource: Clone + Send + Sync + 'static {
    /// Identity type.
    type Id: Clone + Send + Sync + fmt::Display;
    /// Resource client owning the lookup operations.
    type Client: ResourceOps<Self>;
    /// Human-readable resource kind used in errors.
    const KIND: &'static str;

    /// Returns this record's identity.
    fn id(&self) -> Self::Id;
}

/// Lookup by identity.
#[async_trait]
pub trait ResourceOps<R: Resource>: Clone + Send + Sync {
    /// Fetches the current state of `id`; `None` when it does not exist.
    async fn fetch(&self, id: &R::Id) -> Result<Option<R>>;
}

/// Removal by identity.
#[async_trait]
pub trait RemoveOps<R: Resource>: ResourceOps<R> {
    /// Deletes `id` with the resource's delete policy.
    async fn remove(&self, id: &R::Id) -> Result<()>;
}

/// A record plus the resource client it came from.
pub struct Bound<R: Resource> {
    record: R,
    client: R::Client,
}

impl<R: Resource> Bound<R> {
    /// Binds `record` to `client`.
    #[must_use]
    pub fn new(record: R, client: R::Client) -> Self {
        Self { record, client }
    }

    /// The plain record.
    #[must_use]
    pub fn record(&self) -> &R {
        &self.record
    }

    /// Drops the binding and returns the plain record.
    #[must_use]
    pub fn into_inner(self) -> R {
        self.record
    }

    /// The resource client this record is bound to.
    #[must_use]
    pub fn client(&self) -> &R::Client {
        &self.client
    }

    pub(crate) fn set_record(&mut self, record: R) {
        self.record = record;
    }

    /// Reloads every field from the service.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResourceGone`] if the resource no longer exists.
    pub async fn refresh(&mut self) -> Result<()> {
        let id = self.record.id();
        match self.client.fetch(&id).await? {
            Some(record) => {
                self.record = record;
                Ok(())
            }
            None => Err(Error::resource_gone(R::KIND, id)),
        }
    }
}

impl<R: Resource> Bound<R>
where
    R::Client: RemoveOps<R>,
{
    /// Deletes the resource. The local record is left as it was.
    ///
    /// # Errors
    ///
    /// Propagates the resource's delete policy errors.
    pub async fn delete(&self) -> Result<()> {
        self.client.remove(&self.record.id()).await
    }
}

impl<R: Resource> Clone for Bound<R> {
    fn clone(&self) -> Self {
        Self {
            record: self.record.clone(),
            client: self.client.clone(),
        }
    }
}

impl<R: Resource + fmt::Debug> fmt::Debug for Bound<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Bound").field(&self.record).finish()
    }
}

impl<R: Resource> Deref for Bound<R> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.record
    }
}

impl<R: Resource + Serialize> Serialize for Bound<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.record.serialize(serializer)
    }
}

impl<R: Resource + PartialEq> PartialEq<R> for Bound<R> {
    fn eq(&self, other: &R) -> bool {
        self.record == *other
    }
}

impl<R: Resource + PartialEq> PartialEq for Bound<R> {
    fn eq(&self, other: &Self) -> bool {
        self.record == other.record
    }
}

/// Binds every record in `records` to `client`.
pub(crate) fn bind_all<R: Resource>(records: Vec<R>, client: &R::Client) -> Vec<Bound<R>> {
    records
        .into_iter()
        .map(|record| Bound::new(record, client.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct Note {
        id: u32,
        text: String,
    }

    #[derive(Debug, Clone, Default)]
    struct Notes {
        current: Arc<Mutex<Option<Note>>>,
        removed: Arc<Mutex<Vec<u32>>>,
    }

    impl Resource for Note {
        type Id = u32;
        type Client = Notes;
        const KIND: &'static str = "note";

        fn id(&self) -> u32 {
            self.id
        }
    }

    #[async_trait]
    impl ResourceOps<Note> for Notes {
        async fn fetch(&self, _id: &u32) -> Result<Option<Note>> {
            Ok(self.current.lock().expect("lock").clone())
        }
    }

    #[async_trait]
    impl RemoveOps<Note> for Notes {
        async fn remove(&self, id: &u32) -> Result<()> {
            self.removed.lock().expect("lock").push(*id);
            *self.current.lock().expect("lock") = None;
            Ok(())
        }
    }

    fn note(text: &str) -> Note {
        Note {
            id: 1,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn refresh_replaces_record_in_place() {
        let notes = Notes::default();
        *notes.current.lock().expect("lock") = Some(note("new"));
        let mut bound = Bound::new(note("old"), notes);

        bound.refresh().await.expect("refresh");

        assert_eq!(bound.text, "new");
        assert_eq!(bound, note("new"));
    }

    #[tokio::test]
    async fn delete_keeps_local_record_and_refresh_then_fails() {
        let notes = Notes::default();
        *notes.current.lock().expect("lock") = Some(note("x"));
        let mut bound = Bound::new(note("x"), notes.clone());

        bound.delete().await.expect("delete");
        assert_eq!(bound.text, "x");
        assert_eq!(*notes.removed.lock().expect("lock"), vec![1]);

        let err = bound.refresh().await.expect_err("gone");
        assert!(matches!(err, Error::ResourceGone { resource_type: "note", .. }));
    }

    #[test]
    fn serializes_as_plain_record() {
        let bound = Bound::new(note("x"), Notes::default());
        assert_eq!(
            serde_json::to_value(&bound).expect("encode"),
            serde_json::json!({"id": 1, "text": "x"})
        );
    }
}
