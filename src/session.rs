//! Settlement sessions and the store that keeps them.
//!
//! A session owns its members, its transactions and the settlement last
//! computed from them. Every write goes through
//! [`SessionStore::mutate_and_recompute`] (or [`SessionStore::put`]), which
//! validates the new inputs, recomputes, and swaps inputs and result in one
//! step under the session's own lock.

use crate::error::{LedgerError, Result};
use crate::ingest::ensure_unique;
use crate::settlement::Settlement;
use crate::transaction::Transaction;
use log::{debug, info};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Opaque session identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        SessionId(Uuid::new_v4())
    }

    /// Short reference printed on reports, e.g. `ML-1A2B3C4D`.
    pub fn document_number(&self) -> String {
        let simple = self.0.simple().to_string();
        format!("ML-{}", simple[..8].to_uppercase())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = LedgerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(SessionId)
            .map_err(|_| LedgerError::SessionNotFound(s.to_string()))
    }
}

/// What to do with a transaction whose payer is not a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownPayerPolicy {
    /// Refuse the write.
    #[default]
    Reject,
    /// Accept it; the amount counts toward the total but gets no balance row.
    Keep,
}

/// Store configuration.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Idle time after which a session is dropped. `None` keeps sessions
    /// until they are closed.
    pub ttl: Option<Duration>,

    pub unknown_payers: UnknownPayerPolicy,
}

/// The mutable inputs of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionInputs {
    pub members: Vec<String>,
    pub transactions: Vec<Transaction>,
}

impl SessionInputs {
    pub fn new(members: Vec<String>) -> Self {
        SessionInputs {
            members,
            transactions: Vec::new(),
        }
    }

    /// Checks members and, under [`UnknownPayerPolicy::Reject`], payers.
    pub fn validate(&self, policy: UnknownPayerPolicy) -> Result<()> {
        ensure_unique(&self.members)?;

        if policy == UnknownPayerPolicy::Reject {
            let members: HashSet<&str> = self.members.iter().map(String::as_str).collect();
            if let Some(tx) = self
                .transactions
                .iter()
                .find(|tx| !members.contains(tx.payer()))
            {
                return Err(LedgerError::UnknownPayer(tx.payer().to_string()));
            }
        }
        Ok(())
    }

    fn settle(&self) -> Settlement {
        Settlement::compute(&self.transactions, &self.members)
    }
}

/// Snapshot of one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub inputs: SessionInputs,
    pub settlement: Settlement,
}

/// Keyed storage for settlement sessions.
pub trait SessionStore {
    /// Opens a new session for `members`.
    fn create(&self, members: Vec<String>) -> Result<SessionId>;

    /// Returns a snapshot of the session.
    fn get(&self, id: &SessionId) -> Result<Session>;

    /// Stores `inputs` under `id`, replacing any previous session wholesale.
    fn put(&self, id: &SessionId, inputs: SessionInputs) -> Result<Settlement>;

    /// Applies `f` to a copy of the session inputs, then validates and
    /// recomputes. The session is left untouched if any step fails.
    fn mutate_and_recompute<F>(&self, id: &SessionId, f: F) -> Result<Settlement>
    where
        F: FnOnce(&mut SessionInputs) -> Result<()>;

    /// Removes the session.
    fn close(&self, id: &SessionId) -> Result<()>;

    /// Drops idle sessions and returns how many were removed.
    fn evict_expired(&self) -> Result<usize>;

    fn append_transactions(
        &self,
        id: &SessionId,
        transactions: Vec<Transaction>,
    ) -> Result<Settlement> {
        self.mutate_and_recompute(id, |inputs| {
            inputs.transactions.extend(transactions);
            Ok(())
        })
    }

    fn replace_transactions(
        &self,
        id: &SessionId,
        transactions: Vec<Transaction>,
    ) -> Result<Settlement> {
        self.mutate_and_recompute(id, |inputs| {
            inputs.transactions = transactions;
            Ok(())
        })
    }

    fn set_members(&self, id: &SessionId, members: Vec<String>) -> Result<Settlement> {
        self.mutate_and_recompute(id, |inputs| {
            inputs.members = members;
            Ok(())
        })
    }
}

struct Entry {
    session: Session,
    last_access: Instant,
}

/// Process-local [`SessionStore`].
///
/// The map itself sits behind an `RwLock`; each session has its own `Mutex`
/// so recomputing one session never waits on another.
pub struct InMemorySessionStore {
    config: SessionConfig,
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<Entry>>>>,
}

impl InMemorySessionStore {
    pub fn new(config: SessionConfig) -> Self {
        InMemorySessionStore {
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.sessions.read().map_err(|_| LedgerError::StorePoisoned)?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn is_expired(&self, entry: &Entry) -> bool {
        self.config
            .ttl
            .is_some_and(|ttl| entry.last_access.elapsed() >= ttl)
    }

    fn entry(&self, id: &SessionId) -> Result<Arc<Mutex<Entry>>> {
        self.sessions
            .read()
            .map_err(|_| LedgerError::StorePoisoned)?
            .get(id)
            .cloned()
            .ok_or_else(|| LedgerError::SessionNotFound(id.to_string()))
    }

    /// Removes `id` only if it is still expired once the map is locked for
    /// writing. A `put` that refreshed it in the meantime is kept.
    fn remove_if_expired(&self, id: &SessionId) -> Result<()> {
        let mut sessions = self.sessions.write().map_err(|_| LedgerError::StorePoisoned)?;
        let expired = match sessions.get(id) {
            Some(entry) => match entry.lock() {
                Ok(guard) => self.is_expired(&guard),
                Err(_) => true,
            },
            None => false,
        };

        if expired {
            debug!("Session {} expired", id);
            sessions.remove(id);
        }
        Ok(())
    }

    /// Runs `f` on a live entry under its lock, dropping it if it expired.
    fn with_entry<T>(&self, id: &SessionId, f: impl FnOnce(&mut Entry) -> Result<T>) -> Result<T> {
        let entry = self.entry(id)?;
        let mut guard = entry.lock().map_err(|_| LedgerError::StorePoisoned)?;

        if self.is_expired(&guard) {
            drop(guard);
            self.remove_if_expired(id)?;
            return Err(LedgerError::SessionNotFound(id.to_string()));
        }

        let result = f(&mut *guard)?;
        guard.last_access = Instant::now();
        Ok(result)
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl SessionStore for InMemorySessionStore {
    fn create(&self, members: Vec<String>) -> Result<SessionId> {
        let id = SessionId::new();
        self.put(&id, SessionInputs::new(members))?;
        info!("Created session {}", id);
        Ok(id)
    }

    fn get(&self, id: &SessionId) -> Result<Session> {
        self.with_entry(id, |entry| Ok(entry.session.clone()))
    }

    fn put(&self, id: &SessionId, inputs: SessionInputs) -> Result<Settlement> {
        inputs.validate(self.config.unknown_payers)?;
        let settlement = inputs.settle();
        let entry = Entry {
            session: Session {
                id: *id,
                inputs,
                settlement: settlement.clone(),
            },
            last_access: Instant::now(),
        };

        let mut sessions = self.sessions.write().map_err(|_| LedgerError::StorePoisoned)?;
        match sessions.get(id) {
            Some(existing) => {
                *existing.lock().map_err(|_| LedgerError::StorePoisoned)? = entry;
            }
            None => {
                sessions.insert(*id, Arc::new(Mutex::new(entry)));
            }
        }
        Ok(settlement)
    }

    fn mutate_and_recompute<F>(&self, id: &SessionId, f: F) -> Result<Settlement>
    where
        F: FnOnce(&mut SessionInputs) -> Result<()>,
    {
        let policy = self.config.unknown_payers;
        self.with_entry(id, |entry| {
            let mut inputs = entry.session.inputs.clone();
            f(&mut inputs)?;
            inputs.validate(policy)?;

            let settlement = inputs.settle();
            entry.session.inputs = inputs;
            entry.session.settlement = settlement.clone();
            debug!(
                "Session {} recomputed: {} transaction(s)",
                id,
                entry.session.inputs.transactions.len()
            );
            Ok(settlement)
        })
    }

    fn close(&self, id: &SessionId) -> Result<()> {
        let removed = self
            .sessions
            .write()
            .map_err(|_| LedgerError::StorePoisoned)?
            .remove(id);
        match removed {
            Some(_) => {
                info!("Closed session {}", id);
                Ok(())
            }
            None => Err(LedgerError::SessionNotFound(id.to_string())),
        }
    }

    fn evict_expired(&self) -> Result<usize> {
        if self.config.ttl.is_none() {
            return Ok(0);
        }

        let mut sessions = self.sessions.write().map_err(|_| LedgerError::StorePoisoned)?;
        let before = sessions.len();
        // a poisoned session can never be read again, so it goes too
        sessions.retain(|_, entry| match entry.lock() {
            Ok(entry) => !self.is_expired(&entry),
            Err(_) => false,
        });

        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("Evicted {} idle session(s)", evicted);
        }
        Ok(evicted)
    }
}
