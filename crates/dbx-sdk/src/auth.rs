//! Credentials and credential providers.
//!
//! Root clients authenticate with HTTP Basic credentials. When a caller does
//! not pass credentials explicitly, they are looked up by host through a
//! [`CredentialProvider`], by default the user's netrc file.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::error::{Error, Result};

/// HTTP Basic credentials.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BasicAuth {
    /// User name.
    pub username: String,
    /// Password or token.
    pub password: String,
}

impl BasicAuth {
    /// Creates credentials from a user name and password.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Resolves credentials for a host.
pub trait CredentialProvider: Send + Sync + fmt::Debug {
    /// Returns the credentials to use for `host`, if any are known.
    fn credentials_for(&self, host: &str) -> Option<BasicAuth>;
}

/// Fixed host-to-credentials map.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    hosts: HashMap<String, BasicAuth>,
    fallback: Option<BasicAuth>,
}

impl StaticCredentials {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds credentials for `host`.
    #[must_use]
    pub fn with(mut self, host: impl Into<String>, auth: BasicAuth) -> Self {
        self.hosts.insert(host.into(), auth);
        self
    }

    /// Sets credentials used for hosts without an entry.
    #[must_use]
    pub fn with_fallback(mut self, auth: BasicAuth) -> Self {
        self.fallback = Some(auth);
        self
    }
}

impl CredentialProvider for StaticCredentials {
    fn credentials_for(&self, host: &str) -> Option<BasicAuth> {
        self.hosts
            .get(host)
            .cloned()
            .or_else(|| self.fallback.clone())
    }
}

/// Parsed netrc file.
///
/// Supports the `machine`, `default`, `login`, `password` and `account`
/// tokens. A `macdef` token skips the rest of its line and the macro body up
/// to the next blank line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Netrc {
    machines: HashMap<String, BasicAuth>,
    default: Option<BasicAuth>,
}

#[derive(Default)]
struct Entry {
    login: Option<String>,
    password: Option<String>,
}

impl Entry {
    fn into_auth(self) -> Option<BasicAuth> {
        let password = self.password?;
        Some(BasicAuth::new(self.login.unwrap_or_default(), password))
    }
}

enum Target {
    None,
    Machine(String),
    Default,
}

/// Whitespace tokens of a netrc file, line by line.
struct Tokens<'a> {
    lines: std::str::Lines<'a>,
    pending: VecDeque<&'a str>,
}

impl<'a> Tokens<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            lines: content.lines(),
            pending: VecDeque::new(),
        }
    }

    fn next_token(&mut self) -> Option<String> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(token.to_string());
            }
            let line = self.lines.next()?;
            if line.trim_start().starts_with('#') {
                continue;
            }
            self.pending.extend(line.split_whitespace());
        }
    }

    fn value_of(&mut self, keyword: &str) -> Result<String> {
        self.next_token()
            .ok_or_else(|| Error::configuration(format!("netrc: {keyword} without a value")))
    }

    /// Drops the rest of the current line and the macro body, which runs up
    /// to the next empty line.
    fn skip_macro_body(&mut self) {
        self.pending.clear();
        for line in self.lines.by_ref() {
            if line.trim().is_empty() {
                break;
            }
        }
    }
}

impl Netrc {
    /// Parses netrc content.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a token is missing its value.
    pub fn parse(content: &str) -> Result<Self> {
        let mut netrc = Self::default();
        let mut target = Target::None;
        let mut entry = Entry::default();
        let mut tokens = Tokens::new(content);

        while let Some(token) = tokens.next_token() {
            match token.as_str() {
                "machine" => {
                    netrc.commit(std::mem::replace(&mut target, Target::None), entry);
                    entry = Entry::default();
                    target = Target::Machine(tokens.value_of("machine")?);
                }
                "default" => {
                    netrc.commit(std::mem::replace(&mut target, Target::Default), entry);
                    entry = Entry::default();
                }
                "login" => entry.login = Some(tokens.value_of("login")?),
                "password" => entry.password = Some(tokens.value_of("password")?),
                "account" => {
                    tokens.value_of("account")?;
                }
                "macdef" => {
                    tokens.value_of("macdef")?;
                    tokens.skip_macro_body();
                }
                _ => {}
            }
        }
        netrc.commit(target, entry);

        Ok(netrc)
    }

    fn commit(&mut self, target: Target, entry: Entry) {
        let Some(auth) = entry.into_auth() else {
            return;
        };
        match target {
            Target::Machine(host) => {
                self.machines.entry(host).or_insert(auth);
            }
            Target::Default => self.default = Some(auth),
            Target::None => {}
        }
    }

    /// Reads and parses the netrc file at `path`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration(format!("failed to read netrc {}: {e}", path.display()))
        })?;
        Self::parse(&content)
    }

    /// Returns `$NETRC`, or `~/.netrc` when `HOME` is set.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os("NETRC") {
            return Some(PathBuf::from(path));
        }
        std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".netrc"))
    }

    /// Loads the netrc file from `path` or the default location.
    ///
    /// A missing file yields an empty provider.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file exists but cannot be parsed.
    pub fn from_location(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no netrc file");
            return Ok(Self::default());
        }
        Self::load(&path)
    }
}

impl CredentialProvider for Netrc {
    fn credentials_for(&self, host: &str) -> Option<BasicAuth> {
        self.machines
            .get(host)
            .cloned()
            .or_else(|| self.default.clone())
    }
}

/// Netrc provider that reads its file on the first lookup.
///
/// Lookups only happen for calls without explicit credentials, so an
/// unreadable or malformed file never affects callers that pass their own.
/// Such a file is logged and treated as empty.
#[derive(Debug, Default)]
pub struct NetrcFile {
    path: Option<PathBuf>,
    netrc: OnceLock<Netrc>,
}

impl NetrcFile {
    /// Provider for `path`, or for [`Netrc::default_path`] when `None`.
    #[must_use]
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            netrc: OnceLock::new(),
        }
    }

    fn netrc(&self) -> &Netrc {
        self.netrc.get_or_init(|| {
            Netrc::from_location(self.path.as_deref()).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "ignoring unusable netrc file");
                Netrc::default()
            })
        })
    }
}

impl CredentialProvider for NetrcFile {
    fn credentials_for(&self, host: &str) -> Option<BasicAuth> {
        self.netrc().credentials_for(host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_machines_and_default() {
        let netrc = Netrc::parse(
            "machine accounts.cloud.databricks.com\n  login admin\n  password s3cret\n\
             # comment line\n\
             machine dbc-1.cloud.databricks.com login ws password tok account ignored\n\
             default login anon password none\n",
        )
        .expect("parse");

        assert_eq!(
            netrc.credentials_for("accounts.cloud.databricks.com"),
            Some(BasicAuth::new("admin", "s3cret"))
        );
        assert_eq!(
            netrc.credentials_for("dbc-1.cloud.databricks.com"),
            Some(BasicAuth::new("ws", "tok"))
        );
        assert_eq!(
            netrc.credentials_for("elsewhere"),
            Some(BasicAuth::new("anon", "none"))
        );
    }

    #[test]
    fn macdef_bodies_are_skipped() {
        let netrc = Netrc::parse(
            "macdef init\nmachine fake login x password y\n\nmachine real login a password b\n",
        )
        .expect("parse");

        assert_eq!(netrc.credentials_for("fake"), None);
        assert_eq!(netrc.credentials_for("real"), Some(BasicAuth::new("a", "b")));
    }

    #[test]
    fn macdef_after_other_tokens_skips_its_body() {
        let netrc = Netrc::parse(
            "machine h login a password b macdef init\n\
             machine fake login x password y\n\
             \n\
             machine real login c password d\n",
        )
        .expect("parse");

        assert_eq!(netrc.credentials_for("h"), Some(BasicAuth::new("a", "b")));
        assert_eq!(netrc.credentials_for("fake"), None);
        assert_eq!(netrc.credentials_for("real"), Some(BasicAuth::new("c", "d")));
    }

    #[test]
    fn unusable_netrc_file_yields_no_credentials() {
        let path = std::env::temp_dir().join(format!("dbx-netrc-{}", std::process::id()));
        std::fs::write(&path, "machine").expect("write");

        let provider = NetrcFile::new(Some(path.clone()));
        assert_eq!(provider.credentials_for("h"), None);

        std::fs::remove_file(&path).expect("cleanup");
    }

    #[test]
    fn netrc_file_reads_lazily() {
        let path = std::env::temp_dir().join(format!("dbx-netrc-lazy-{}", std::process::id()));
        let provider = NetrcFile::new(Some(path.clone()));
        std::fs::write(&path, "machine h login a password b\n").expect("write");

        assert_eq!(provider.credentials_for("h"), Some(BasicAuth::new("a", "b")));

        std::fs::remove_file(&path).expect("cleanup");
    }

    #[test]
    fn first_machine_entry_wins() {
        let netrc = Netrc::parse("machine h login a password 1\nmachine h login b password 2\n")
            .expect("parse");
        assert_eq!(netrc.credentials_for("h"), Some(BasicAuth::new("a", "1")));
    }

    #[test]
    fn dangling_token_is_an_error() {
        let err = Netrc::parse("machine h login").expect_err("should fail");
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn missing_file_is_empty() {
        let netrc =
            Netrc::from_location(Some(Path::new("/nonexistent/dbx/netrc"))).expect("empty");
        assert_eq!(netrc, Netrc::default());
    }

    #[test]
    fn static_credentials_fall_back() {
        let provider = StaticCredentials::new()
            .with("h", BasicAuth::new("a", "b"))
            .with_fallback(BasicAuth::new("c", "d"));
        assert_eq!(provider.credentials_for("h"), Some(BasicAuth::new("a", "b")));
        assert_eq!(provider.credentials_for("x"), Some(BasicAuth::new("c", "d")));
    }

    #[test]
    fn debug_redacts_password() {
        let debug = format!("{:?}", BasicAuth::new("admin", "hunter2"));
        assert!(debug.contains("admin"));
        assert!(!debug.contains("hunter2"));
    }
}
