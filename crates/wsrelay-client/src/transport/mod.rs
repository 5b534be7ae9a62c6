//! WebSocket transport construction.
//!
//! Endpoint problems are split the way the channel needs them: a request
//! that cannot be built at all is `InvalidEndpoint` (synchronous
//! construction failure, no close follows), while a dial that fails on the
//! wire is `Transport` (behaves like an error-then-close on a live socket).

pub mod codec;

use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use wsrelay_core::error::{Result, WsRelayError};

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Open a WebSocket to `endpoint`, advertising `protocols` as the
/// sub-protocol list when non-empty.
pub async fn connect(endpoint: &str, protocols: &[String]) -> Result<WsStream> {
    let mut request = endpoint
        .into_client_request()
        .map_err(|e| WsRelayError::InvalidEndpoint(format!("{endpoint}: {e}")))?;

    if !protocols.is_empty() {
        let value = protocols
            .join(", ")
            .parse()
            .map_err(|e| WsRelayError::InvalidEndpoint(format!("bad sub-protocol list: {e}")))?;
        request
            .headers_mut()
            .insert("Sec-WebSocket-Protocol", value);
    }

    let (ws, _response) = connect_async(request)
        .await
        .map_err(|e| WsRelayError::Transport(format!("connect failed: {e}")))?;

    Ok(ws)
}
