use std::sync::Arc;

use drawsync_shared::ChannelMessage;
use tokio::sync::{mpsc, RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::state::{AppState, Session, LOBBY_SESSION};

pub fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn normalize_session_id(value: &str) -> Option<String> {
    if value == LOBBY_SESSION {
        return Some(LOBBY_SESSION.to_string());
    }
    let parsed = Uuid::parse_str(value).ok()?;
    Some(parsed.to_string())
}

/// Registers `peer` in the session named `session_id`, creating the session
/// if needed. The peer is inserted while the registry lock is held, so
/// `remove_if_empty` can never drop a session a peer is joining.
pub async fn join_session(
    state: &AppState,
    session_id: &str,
    connection_id: Uuid,
    peer: mpsc::UnboundedSender<ChannelMessage>,
) -> (Arc<RwLock<Session>>, usize) {
    let mut sessions = state.sessions.write().await;
    let session = sessions
        .entry(session_id.to_string())
        .or_insert_with(|| {
            debug!(session = %session_id, "creating session");
            Arc::new(RwLock::new(Session::default()))
        })
        .clone();
    let peers = {
        let mut guard = session.write().await;
        guard.peers.insert(connection_id, peer);
        guard.peers.len()
    };
    (session, peers)
}

/// Drops the session from the registry once its last peer is gone.
pub async fn remove_if_empty(state: &AppState, session_id: &str, session: &Arc<RwLock<Session>>) {
    if !session.read().await.peers.is_empty() {
        return;
    }
    let mut sessions = state.sessions.write().await;
    if let Some(current) = sessions.get(session_id) {
        if Arc::ptr_eq(current, session) && current.read().await.peers.is_empty() {
            sessions.remove(session_id);
            debug!(session = %session_id, "removed empty session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::RelayLimits;

    #[test]
    fn normalize_accepts_uuids_and_lobby() {
        let id = "6F9619FF-8B86-D011-B42D-00C04FC964FF";
        assert_eq!(
            normalize_session_id(id).as_deref(),
            Some("6f9619ff-8b86-d011-b42d-00c04fc964ff")
        );
        assert_eq!(normalize_session_id("lobby").as_deref(), Some("lobby"));
        assert_eq!(normalize_session_id("../etc/passwd"), None);
        assert!(normalize_session_id(&new_session_id()).is_some());
    }

    #[tokio::test]
    async fn same_id_returns_same_session() {
        let state = AppState::new(RelayLimits::default());
        let (tx, _rx) = mpsc::unbounded_channel();
        let (first, _) = join_session(&state, "lobby", Uuid::new_v4(), tx.clone()).await;
        let (second, peers) = join_session(&state, "lobby", Uuid::new_v4(), tx).await;
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(peers, 2);
    }

    #[tokio::test]
    async fn empty_session_is_removed_but_busy_one_stays() {
        let state = AppState::new(RelayLimits::default());
        let (tx, _rx) = mpsc::unbounded_channel();
        let (session, _) = join_session(&state, "lobby", Uuid::new_v4(), tx).await;

        remove_if_empty(&state, "lobby", &session).await;
        assert!(state.sessions.read().await.contains_key("lobby"));

        session.write().await.peers.clear();
        remove_if_empty(&state, "lobby", &session).await;
        assert!(!state.sessions.read().await.contains_key("lobby"));
    }

    #[tokio::test]
    async fn peer_joining_as_last_peer_leaves_keeps_the_session() {
        let state = AppState::new(RelayLimits::default());
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let (tx, _rx) = mpsc::unbounded_channel();

        let (a_session, _) = join_session(&state, "lobby", a, tx.clone()).await;
        let (b_session, _) = join_session(&state, "lobby", b, tx.clone()).await;
        a_session.write().await.peers.remove(&a);
        remove_if_empty(&state, "lobby", &a_session).await;
        let (c_session, peers) = join_session(&state, "lobby", c, tx).await;

        assert!(Arc::ptr_eq(&b_session, &c_session));
        assert_eq!(peers, 2);
        let sessions = state.sessions.read().await;
        let registered = sessions.get("lobby").cloned();
        drop(sessions);
        assert!(registered.is_some_and(|current| Arc::ptr_eq(&current, &b_session)));
    }

    #[tokio::test]
    async fn concurrent_join_and_leave_never_orphan_a_peer() {
        let state = AppState::new(RelayLimits::default());
        for _ in 0..50 {
            let (tx, _rx) = mpsc::unbounded_channel();
            let leaver = Uuid::new_v4();
            let (session, _) = join_session(&state, "lobby", leaver, tx.clone()).await;

            let leave = {
                let state = state.clone();
                let session = session.clone();
                tokio::spawn(async move {
                    session.write().await.peers.remove(&leaver);
                    remove_if_empty(&state, "lobby", &session).await;
                })
            };
            let joiner = Uuid::new_v4();
            let join = {
                let state = state.clone();
                tokio::spawn(async move { join_session(&state, "lobby", joiner, tx).await })
            };
            leave.await.unwrap();
            let (joined, _) = join.await.unwrap();

            let current = state.sessions.read().await.get("lobby").cloned().unwrap();
            assert!(Arc::ptr_eq(&current, &joined));
            assert!(current.read().await.peers.contains_key(&joiner));
            current.write().await.peers.clear();
            remove_if_empty(&state, "lobby", &current).await;
        }
    }
}
