//! Connection registry: maps logical identities and roles to live WebSocket
//! connection handles.
//!
//! Three structures are kept in lockstep behind one mutex:
//! - `members`: every live team-member connection (global broadcast set)
//! - `by_team`: join-order buckets per team (team broadcast)
//! - `by_identity`: one connection per `(team, name)` (direct messaging)
//!
//! Invariant: every connection in `by_identity` appears in exactly one
//! `by_team` bucket and in `members`. Removal is atomic across all three —
//! a disconnecting socket is never observable in a partially-removed state.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use axum::extract::ws::{CloseFrame, Message};

use crate::identity::Identity;
use crate::ws::ConnectionSender;

/// Close code sent to a connection displaced by a duplicate `(team, name)`
/// login. Same numbering space as the WS auth close codes.
pub const CLOSE_REPLACED: u16 = 4000;

/// Process-unique id per accepted connection. Disconnect removes exactly the
/// connection that is closing, never a same-identity replacement.
pub type ConnectionId = u64;

#[derive(Debug, Clone)]
struct ConnectionHandle {
    id: ConnectionId,
    identity: Identity,
    tx: ConnectionSender,
}

#[derive(Default)]
struct RegistryInner {
    members: Vec<ConnectionHandle>,
    by_team: HashMap<u32, Vec<ConnectionHandle>>,
    by_identity: HashMap<(u32, String), ConnectionHandle>,
    admin: Option<ConnectionSender>,
}

/// The registry owns every live connection handle for its lifetime.
/// All mutations serialize on one mutex; nothing is held across an await
/// (sends are non-blocking pushes into per-connection channels).
pub struct SessionRegistry {
    inner: Mutex<RegistryInner>,
    next_id: AtomicU64,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RegistryInner::default()),
            next_id: AtomicU64::new(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        self.inner.lock().expect("registry mutex poisoned")
    }

    /// Accept the admin connection. Only one admin session is meaningful at a
    /// time: last writer wins, replacement is not an error.
    pub fn connect_admin(&self, tx: ConnectionSender) {
        let replaced = self.lock().admin.replace(tx).is_some();
        if replaced {
            tracing::info!("admin connection replaced by a newer session");
        } else {
            tracing::info!("admin connected");
        }
    }

    /// Clear the admin slot, but only if it still holds this connection —
    /// a stale actor unwinding after replacement must not evict the new
    /// admin. Safe to call when already empty.
    pub fn disconnect_admin(&self, tx: &ConnectionSender) {
        let mut inner = self.lock();
        if inner
            .admin
            .as_ref()
            .is_some_and(|current| current.same_channel(tx))
        {
            inner.admin = None;
            tracing::info!("admin disconnected");
        }
    }

    pub fn admin_sender(&self) -> Option<ConnectionSender> {
        self.lock().admin.clone()
    }

    /// Accept a member connection and insert it into all three structures,
    /// creating the team bucket on first use.
    ///
    /// Duplicate `(team, name)`: close-and-replace. The displaced socket
    /// receives a Close frame with [`CLOSE_REPLACED`] and is removed before
    /// the new handle is inserted, so the slot never holds two connections
    /// and the old one cannot leak.
    pub fn connect_member(&self, identity: &Identity, tx: ConnectionSender) -> ConnectionId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let displaced = {
            let mut inner = self.lock();
            let displaced = inner
                .by_identity
                .get(&identity.key())
                .map(|old| (old.id, old.tx.clone()));
            if let Some((old_id, _)) = displaced {
                remove_connection(&mut inner, identity, old_id);
            }

            let handle = ConnectionHandle {
                id,
                identity: identity.clone(),
                tx,
            };
            inner.members.push(handle.clone());
            inner
                .by_team
                .entry(identity.team)
                .or_default()
                .push(handle.clone());
            inner.by_identity.insert(identity.key(), handle);
            displaced
        };

        if let Some((_, old_tx)) = displaced {
            tracing::info!(
                name = %identity.name,
                team = identity.team,
                "duplicate identity: closing previous connection"
            );
            let _ = old_tx.send(Message::Close(Some(CloseFrame {
                code: CLOSE_REPLACED,
                reason: "replaced by new session".into(),
            })));
        }

        tracing::debug!(name = %identity.name, team = identity.team, conn_id = id, "member registered");
        id
    }

    /// Remove a member connection from all three structures atomically.
    /// Idempotent: a disconnect may race the socket error path, so removing
    /// an already-removed connection is a no-op. Returns whether this call
    /// removed anything — a displaced connection's actor gets `false` and
    /// must not announce a departure for an identity that is still live.
    pub fn disconnect_member(&self, identity: &Identity, id: ConnectionId) -> bool {
        let mut inner = self.lock();
        remove_connection(&mut inner, identity, id)
    }

    /// Team → member names currently connected, in join order. Used to build
    /// per-team polls with live-member option lists and for admin dumps.
    pub fn registrants(&self) -> BTreeMap<u32, Vec<String>> {
        let inner = self.lock();
        inner
            .by_team
            .iter()
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(|(team, bucket)| {
                let names = bucket.iter().map(|h| h.identity.name.clone()).collect();
                (*team, names)
            })
            .collect()
    }

    /// Snapshot of every live member sender (global broadcast set).
    pub fn member_senders(&self) -> Vec<ConnectionSender> {
        self.lock().members.iter().map(|h| h.tx.clone()).collect()
    }

    /// Snapshot of one team's senders in current bucket order. An unknown
    /// team yields an empty set.
    pub fn team_senders(&self, team: u32) -> Vec<ConnectionSender> {
        self.lock()
            .by_team
            .get(&team)
            .map(|bucket| bucket.iter().map(|h| h.tx.clone()).collect())
            .unwrap_or_default()
    }

    /// Sender for one named participant, if connected.
    pub fn direct_sender(&self, team: u32, name: &str) -> Option<ConnectionSender> {
        self.lock()
            .by_identity
            .get(&(team, name.to_string()))
            .map(|h| h.tx.clone())
    }

    /// Identities of every live member connection.
    pub fn member_identities(&self) -> Vec<Identity> {
        self.lock()
            .members
            .iter()
            .map(|h| h.identity.clone())
            .collect()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Remove one connection (matched by id) from all three structures. No-op if
/// the id is no longer present anywhere; returns whether anything was removed.
fn remove_connection(inner: &mut RegistryInner, identity: &Identity, id: ConnectionId) -> bool {
    let before = inner.members.len();
    inner.members.retain(|h| h.id != id);
    if let Some(bucket) = inner.by_team.get_mut(&identity.team) {
        bucket.retain(|h| h.id != id);
    }
    // Only vacate the identity slot if it is still held by this connection.
    if inner
        .by_identity
        .get(&identity.key())
        .is_some_and(|h| h.id == id)
    {
        inner.by_identity.remove(&identity.key());
    }
    inner.members.len() != before
}
