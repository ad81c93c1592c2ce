//! Registry of root clients keyed by account id and workspace host.
//!
//! Root clients are created lazily on first use and then shared: asking the
//! registry for the same account or host again returns the cached instance,
//! unless the caller passes explicit credentials that differ from the cached
//! client's, in which case a fresh client replaces the entry. Entries are
//! never evicted.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use crate::account::{ACCOUNT_HOST, AccountClient};
use crate::auth::{BasicAuth, CredentialProvider, NetrcFile};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::rest::RestClient;
use crate::transport::{Connector, HttpConnector};
use crate::workspace::WorkspaceClient;

/// Lazily populated map of root clients.
pub struct ClientCache<K, C> {
    entries: Mutex<HashMap<K, C>>,
}

impl<K, C> Default for ClientCache<K, C> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<K, C> fmt::Debug for ClientCache<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCache")
            .field("entries", &self.lock().len())
            .finish()
    }
}

impl<K, C> ClientCache<K, C> {
    fn lock(&self) -> MutexGuard<'_, HashMap<K, C>> {
        // A panic while holding the lock cannot leave a half-written entry.
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Number of cached clients.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true when nothing has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl<K: Eq + Hash, C: Clone> ClientCache<K, C> {
    /// Returns the cached client for `key` if `reuse` accepts it, otherwise
    /// builds a new one and stores it in place of the old entry.
    ///
    /// # Errors
    ///
    /// Propagates errors from `build`; the cache is left unchanged.
    pub fn get_or_try_insert(
        &self,
        key: K,
        reuse: impl FnOnce(&C) -> bool,
        build: impl FnOnce() -> Result<C>,
    ) -> Result<C> {
        let mut entries = self.lock();
        if let Some(existing) = entries.get(&key) {
            if reuse(existing) {
                return Ok(existing.clone());
            }
        }
        let client = build()?;
        entries.insert(key, client.clone());
        Ok(client)
    }
}

/// Factory and cache for account and workspace root clients.
#[derive(Debug)]
pub struct ClientRegistry {
    config: ClientConfig,
    connector: Arc<dyn Connector>,
    credentials: Arc<dyn CredentialProvider>,
    accounts: ClientCache<Uuid, AccountClient>,
    workspaces: ClientCache<String, WorkspaceClient>,
}

impl ClientRegistry {
    /// Creates a registry that connects over HTTPS and resolves missing
    /// credentials from the netrc file.
    ///
    /// The netrc file is read on the first call without explicit credentials.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        let netrc = NetrcFile::new(config.netrc_path.clone());
        let connector = HttpConnector::new(config.clone());
        Self::with_parts(config, Arc::new(connector), Arc::new(netrc))
    }

    /// Creates a registry from explicit parts.
    #[must_use]
    pub fn with_parts(
        config: ClientConfig,
        connector: Arc<dyn Connector>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            config,
            connector,
            credentials,
            accounts: ClientCache::default(),
            workspaces: ClientCache::default(),
        }
    }

    /// The configuration clients are built with.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Root client for `account_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if `auth` is `None` and no credentials
    /// are known for the accounts host, or an error from the connector.
    pub fn account(&self, account_id: Uuid, auth: Option<BasicAuth>) -> Result<AccountClient> {
        self.accounts.get_or_try_insert(
            account_id,
            |existing| reusable(existing.auth(), auth.as_ref()),
            || {
                let rest = self.connect(ACCOUNT_HOST, auth.clone())?;
                tracing::debug!(%account_id, "created account client");
                Ok(AccountClient::new(account_id, rest))
            },
        )
    }

    /// Root client for the workspace served at `host`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if `auth` is `None` and no credentials
    /// are known for `host`, or an error from the connector.
    pub fn workspace(&self, host: &str, auth: Option<BasicAuth>) -> Result<WorkspaceClient> {
        if host.trim().is_empty() {
            return Err(Error::InvalidInput("workspace host is empty".to_string()));
        }
        self.workspaces.get_or_try_insert(
            host.to_string(),
            |existing| reusable(existing.auth(), auth.as_ref()),
            || {
                let rest = self.connect(host, auth.clone())?;
                tracing::debug!(host, "created workspace client");
                Ok(WorkspaceClient::new(rest))
            },
        )
    }

    fn connect(&self, host: &str, auth: Option<BasicAuth>) -> Result<RestClient> {
        let auth = match auth {
            Some(auth) => auth,
            None => self.credentials.credentials_for(host).ok_or_else(|| {
                Error::configuration(format!(
                    "no credentials for {host}: pass them explicitly or add a netrc entry"
                ))
            })?,
        };
        let transport = self.connector.connect(host, &auth)?;
        Ok(RestClient::new(host, auth, transport))
    }
}

fn reusable(existing: &BasicAuth, requested: Option<&BasicAuth>) -> bool {
    match requested {
        Some(requested) => requested == existing,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn cache_reuses_accepted_entries_and_replaces_rejected_ones() {
        let cache: ClientCache<&str, u32> = ClientCache::default();
        let builds = Cell::new(0);
        let build = || {
            builds.set(builds.get() + 1);
            Ok(builds.get())
        };

        assert_eq!(cache.get_or_try_insert("a", |_| true, build).expect("first"), 1);
        assert_eq!(cache.get_or_try_insert("a", |_| true, build).expect("reused"), 1);
        assert_eq!(cache.get_or_try_insert("a", |_| false, build).expect("replaced"), 2);
        assert_eq!(cache.get_or_try_insert("a", |_| true, build).expect("reused"), 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failed_build_leaves_cache_untouched() {
        let cache: ClientCache<&str, u32> = ClientCache::default();
        let err = cache
            .get_or_try_insert("a", |_| true, || Err(Error::configuration("nope")))
            .expect_err("build fails");
        assert!(matches!(err, Error::Configuration { .. }));
        assert!(cache.is_empty());
    }

    #[test]
    fn explicit_credentials_must_match_to_reuse() {
        let alice = BasicAuth::new("alice", "pw");
        assert!(reusable(&alice, None));
        assert!(reusable(&alice, Some(&BasicAuth::new("alice", "pw"))));
        assert!(!reusable(&alice, Some(&BasicAuth::new("bob", "pw"))));
    }
}
