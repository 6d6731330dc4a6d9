use std::collections::HashMap;
use std::sync::Arc;

use drawsync_shared::ChannelMessage;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

/// Board used by clients that connect without a session id.
pub const LOBBY_SESSION: &str = "lobby";
pub const MAX_POINTS_PER_STROKE: usize = 5000;
pub const MAX_COLOR_LEN: usize = 32;

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<RwLock<HashMap<String, Arc<RwLock<Session>>>>>,
    pub limits: RelayLimits,
}

impl AppState {
    pub fn new(limits: RelayLimits) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            limits,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RelayLimits {
    pub max_points: usize,
    pub max_color_len: usize,
}

impl Default for RelayLimits {
    fn default() -> Self {
        Self {
            max_points: MAX_POINTS_PER_STROKE,
            max_color_len: MAX_COLOR_LEN,
        }
    }
}

/// A board. The relay keeps no strokes, only the outbox of every peer.
#[derive(Default)]
pub struct Session {
    pub peers: HashMap<Uuid, mpsc::UnboundedSender<ChannelMessage>>,
}
