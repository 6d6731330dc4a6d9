use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Reflect, Uint8Array};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket, Window};

use drawsync_shared::{encode_text, ChannelMessage};

use crate::channel::{ChannelError, SyncChannel};

#[derive(Debug)]
pub enum WsEvent {
    Open,
    Close,
    Error,
    Text(String),
    Binary(Vec<u8>),
}

pub struct WsChannel {
    socket: WebSocket,
}

impl SyncChannel for WsChannel {
    fn is_open(&self) -> bool {
        self.socket.ready_state() == WebSocket::OPEN
    }

    fn publish(&mut self, message: &ChannelMessage) -> Result<(), ChannelError> {
        if !self.is_open() {
            return Err(ChannelError::Closed);
        }
        let payload = encode_text(message)?;
        self.socket
            .send_with_str(&payload)
            .map_err(|error| ChannelError::Transport(format!("{error:?}")))
    }
}

pub fn websocket_url(window: &Window) -> Result<String, JsValue> {
    let location = window.location();
    let protocol = location.protocol()?;
    let host = location.host()?;
    let scheme = if protocol == "https:" { "wss" } else { "ws" };
    match session_id_from_location(&location) {
        Some(session_id) => Ok(format!("{scheme}://{host}/ws/{session_id}")),
        None => Ok(format!("{scheme}://{host}/ws")),
    }
}

fn session_id_from_location(location: &web_sys::Location) -> Option<String> {
    let path = location.pathname().ok()?;
    let mut parts = path.trim_matches('/').split('/');
    if parts.next()? != "s" {
        return None;
    }
    let session_id = parts.next()?;
    if session_id.is_empty() {
        None
    } else {
        Some(session_id.to_string())
    }
}

/// Opens the socket once for the page. There is no reconnect: when it drops,
/// publishing stops and drawing continues locally.
pub fn connect(window: &Window) -> Result<(WsChannel, WebSocket), JsValue> {
    let url = websocket_url(window)?;
    log::info!("connecting sync channel to {url}");
    let socket = WebSocket::new(&url)?;
    let _ = Reflect::set(
        socket.as_ref(),
        &JsValue::from_str("binaryType"),
        &JsValue::from_str("arraybuffer"),
    );

    {
        let socket_cb = socket.clone();
        let onbeforeunload = Closure::<dyn FnMut(Event)>::new(move |_| {
            let _ = socket_cb.close();
        });
        window.add_event_listener_with_callback(
            "beforeunload",
            onbeforeunload.as_ref().unchecked_ref(),
        )?;
        onbeforeunload.forget();
    }

    Ok((
        WsChannel {
            socket: socket.clone(),
        },
        socket,
    ))
}

pub fn listen(socket: &WebSocket, on_event: impl 'static + FnMut(WsEvent)) {
    let on_event = Rc::new(RefCell::new(on_event));

    {
        let on_event = on_event.clone();
        let onopen = Closure::<dyn FnMut(Event)>::new(move |_| {
            on_event.borrow_mut()(WsEvent::Open);
        });
        socket.set_onopen(Some(onopen.as_ref().unchecked_ref()));
        onopen.forget();
    }

    {
        let on_event = on_event.clone();
        let onclose = Closure::<dyn FnMut(CloseEvent)>::new(move |_| {
            on_event.borrow_mut()(WsEvent::Close);
        });
        socket.set_onclose(Some(onclose.as_ref().unchecked_ref()));
        onclose.forget();
    }

    {
        let on_event = on_event.clone();
        let onerror = Closure::<dyn FnMut(Event)>::new(move |_| {
            on_event.borrow_mut()(WsEvent::Error);
        });
        socket.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onerror.forget();
    }

    {
        let onmessage = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
            let data = event.data();
            let message = if let Some(text) = data.as_string() {
                WsEvent::Text(text)
            } else if let Ok(buffer) = data.dyn_into::<js_sys::ArrayBuffer>() {
                WsEvent::Binary(Uint8Array::new(&buffer).to_vec())
            } else {
                log::warn!("WS message data is not a string or arraybuffer");
                return;
            };
            on_event.borrow_mut()(message);
        });
        socket.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
        onmessage.forget();
    }
}
