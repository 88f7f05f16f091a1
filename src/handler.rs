//! WebSocket connection handler
//!
//! Handles individual client connections: WebSocket handshake, frame
//! decoding, and bidirectional communication with the RelayServer.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use crate::error::AppError;
use crate::message::{ClientRequest, Envelope, WireCodec};
use crate::server::ServerCommand;
use crate::types::HandleId;

/// Handle a new TCP connection
///
/// Performs the WebSocket handshake, registers the session with the relay,
/// and pumps frames in both directions until either side ends.
pub async fn handle_connection<C: WireCodec>(
    stream: TcpStream,
    cmd_tx: mpsc::Sender<ServerCommand>,
    codec: C,
) -> Result<(), AppError> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    debug!("New TCP connection from {}", peer_addr);

    // WebSocket handshake
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let handle = HandleId::new();
    info!("Handle {} opened from {}", handle, peer_addr);

    // Channel for relay -> client envelopes; unbounded so the relay never
    // waits on a slow reader and never drops for an open one
    let (msg_tx, mut msg_rx) = mpsc::unbounded_channel::<Envelope>();

    if cmd_tx
        .send(ServerCommand::Connect {
            handle,
            sender: msg_tx,
        })
        .await
        .is_err()
    {
        error!("Failed to register handle {} - relay closed", handle);
        return Err(AppError::ChannelSend);
    }

    let cmd_tx_read = cmd_tx.clone();
    let read_codec = codec.clone();

    // Spawn read task (WebSocket -> ServerCommand)
    let mut read_task = tokio::spawn(async move {
        while let Some(msg_result) = ws_receiver.next().await {
            let decoded = match msg_result {
                Ok(Message::Text(text)) => read_codec.decode(&text),
                Ok(Message::Binary(bytes)) => String::from_utf8(bytes)
                    .map_err(AppError::from)
                    .and_then(|text| read_codec.decode(&text)),
                Ok(Message::Close(_)) => {
                    debug!("Handle {} sent close frame", handle);
                    break;
                }
                Ok(_) => {
                    // Ping/pong are answered by tungstenite
                    continue;
                }
                Err(e) => {
                    let _ = cmd_tx_read
                        .send(ServerCommand::Error {
                            handle,
                            cause: e.to_string(),
                        })
                        .await;
                    break;
                }
            };

            match decoded {
                Ok(request) => {
                    if !forward(&cmd_tx_read, handle, request).await {
                        debug!("Relay closed, ending read task for {}", handle);
                        break;
                    }
                }
                Err(e) => {
                    warn!("Ignoring malformed request from {}: {}", handle, e);
                }
            }
        }
        debug!("Read task ended for {}", handle);
    });

    // Spawn write task (Envelope -> WebSocket)
    let mut write_task = tokio::spawn(async move {
        while let Some(envelope) = msg_rx.recv().await {
            match codec.encode(&envelope) {
                Ok(frame) => {
                    if ws_sender.send(Message::Text(frame)).await.is_err() {
                        debug!("WebSocket send failed, ending write task");
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to encode envelope: {}", e);
                }
            }
        }
        debug!("Write task ended for {}", handle);

        let _ = ws_sender.close().await;
    });

    // The surviving task is aborted: nothing is forwarded after Disconnect
    tokio::select! {
        _ = &mut read_task => {
            debug!("Read task completed for {}", handle);
            write_task.abort();
        }
        _ = &mut write_task => {
            debug!("Write task completed for {}", handle);
            read_task.abort();
        }
    }

    // No-op in the relay if an Error event already released the handle
    let _ = cmd_tx.send(ServerCommand::Disconnect { handle }).await;

    info!("Handle {} closed", handle);

    Ok(())
}

/// Forward a decoded request to the relay; false once the relay is gone
async fn forward(
    cmd_tx: &mpsc::Sender<ServerCommand>,
    handle: HandleId,
    request: ClientRequest,
) -> bool {
    cmd_tx
        .send(ServerCommand::Request { handle, request })
        .await
        .is_ok()
}
