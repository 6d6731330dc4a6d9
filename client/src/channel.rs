use drawsync_shared::{ChannelMessage, EncodeError};

#[derive(thiserror::Error, Debug)]
pub enum ChannelError {
    #[error("sync channel is not open")]
    Closed,
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("transport rejected message: {0}")]
    Transport(String),
}

/// Outbound half of the transport. Inbound frames are pushed into the engine
/// by whoever owns the connection.
pub trait SyncChannel {
    fn is_open(&self) -> bool;
    fn publish(&mut self, message: &ChannelMessage) -> Result<(), ChannelError>;
}

/// A channel that is never connected. Everything published to it is dropped.
#[derive(Debug, Default)]
pub struct Offline;

impl SyncChannel for Offline {
    fn is_open(&self) -> bool {
        false
    }

    fn publish(&mut self, _message: &ChannelMessage) -> Result<(), ChannelError> {
        Err(ChannelError::Closed)
    }
}
