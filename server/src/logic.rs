use std::sync::Arc;

use drawsync_shared::{decode_binary, decode_text, ChannelMessage, DecodeError, Stroke};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::state::{RelayLimits, Session};

pub enum Frame<'a> {
    Text(&'a str),
    Binary(&'a [u8]),
}

#[derive(thiserror::Error, Debug)]
pub enum RelayError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Decodes one inbound frame and applies the relay limits to it.
pub fn accept_frame(frame: Frame<'_>, limits: &RelayLimits) -> Result<ChannelMessage, RelayError> {
    let message = match frame {
        Frame::Text(text) => decode_text(text)?,
        Frame::Binary(payload) => decode_binary(payload)?,
    };
    sanitize_message(message, limits)
}

pub fn sanitize_message(
    message: ChannelMessage,
    limits: &RelayLimits,
) -> Result<ChannelMessage, RelayError> {
    match message {
        ChannelMessage::Draw(stroke) => Ok(ChannelMessage::Draw(sanitize_stroke(stroke, limits)?)),
    }
}

/// Strokes past the point limit are cut to their first `max_points` points,
/// so peers keep receiving every republish of a long drag.
fn sanitize_stroke(mut stroke: Stroke, limits: &RelayLimits) -> Result<Stroke, RelayError> {
    let count = stroke.point_count();
    if count > limits.max_points {
        debug!(count, max = limits.max_points, "truncating stroke");
        stroke.points.truncate(limits.max_points.max(1) * 2);
    }
    stroke.color = sanitize_color(stroke.color, limits.max_color_len);
    Ok(stroke)
}

fn sanitize_color(color: String, max_len: usize) -> String {
    if color.is_empty() {
        return drawsync_shared::DEFAULT_COLOR.to_string();
    }
    if color.chars().count() > max_len {
        return color.chars().take(max_len).collect();
    }
    color
}

/// Queues `message` for every peer except `sender`. Peers whose outbox is
/// closed are dropped from the session. Returns how many peers received it.
pub async fn broadcast_except(
    session: &Arc<RwLock<Session>>,
    sender: Uuid,
    message: ChannelMessage,
) -> usize {
    let mut stale = Vec::new();
    let mut delivered = 0;
    {
        let session = session.read().await;
        for (id, tx) in session.peers.iter() {
            if *id == sender {
                continue;
            }
            if tx.send(message.clone()).is_err() {
                stale.push(*id);
            } else {
                delivered += 1;
            }
        }
    }

    if !stale.is_empty() {
        let mut session = session.write().await;
        for id in stale {
            session.peers.remove(&id);
        }
    }
    delivered
}
