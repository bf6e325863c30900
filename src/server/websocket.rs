use crate::agent::ChatAgent;
use crate::config::prompt::PromptStore;
use crate::models::websocket::{ ClientMessage, ServerMessage };
use crate::widget::{ ChatPanel, TurnController, TurnOutcome };

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{ mpsc, Mutex };
use tokio::net::TcpListener;
use tokio::io::{ AsyncRead, AsyncWrite };

use tokio_tungstenite::{ accept_async, WebSocketStream };
use tokio_tungstenite::tungstenite::protocol::Message;

use chrono::Utc;
use log::{ info, warn, error, debug };
use futures::{ SinkExt, StreamExt };
use uuid::Uuid;

const MAX_MESSAGE_SIZE: usize = 1 * 1024 * 1024;
const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn start_ws_server(
    addr: &str,
    agent: ChatAgent,
    prompts: Arc<PromptStore>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let listener = TcpListener::bind(addr).await?;
    info!("WS server listening on: {}", listener.local_addr()?);
    serve_ws(listener, agent, prompts).await
}

pub async fn serve_ws(
    listener: TcpListener,
    agent: ChatAgent,
    prompts: Arc<PromptStore>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    loop {
        let (stream, peer) = listener.accept().await?;
        info!("Incoming connection from: {}", peer);
        let agent_clone = agent.clone();
        let prompts_clone = Arc::clone(&prompts);

        tokio::spawn(async move {
            if let Err(e) = process_connection(peer, stream, agent_clone, prompts_clone).await {
                error!("Failed to process connection for {}: {}", peer, e);
            }
        });
    }
}

async fn process_connection<S>(
    peer: SocketAddr,
    stream: S,
    agent: ChatAgent,
    prompts: Arc<PromptStore>,
) -> Result<(), Box<dyn Error + Send + Sync>>
    where S: AsyncRead + AsyncWrite + Unpin + Send + 'static
{
    match accept_async(stream).await {
        Ok(ws) => {
            handle_connection(peer, ws, agent, prompts).await;
            Ok(())
        }
        Err(e) => {
            error!("Handshake failed for {}: {}", peer, e);
            Err(Box::new(e) as _)
        }
    }
}

/// One connection is one session: its own conversation log and panel, dropped
/// when the socket closes.
pub async fn handle_connection<S>(
    peer: SocketAddr,
    websocket: WebSocketStream<S>,
    agent: ChatAgent,
    prompts: Arc<PromptStore>,
)
    where S: AsyncRead + AsyncWrite + Unpin + Send + 'static
{
    let session_id = Uuid::new_v4().to_string();
    info!("Assigned session ID {} to {}", session_id, peer);

    let (mut ws_tx, mut ws_rx) = websocket.split();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<ServerMessage>();
    let (pong_tx, mut pong_rx) = mpsc::unbounded_channel::<Vec<u8>>();

    let writer = tokio::spawn(async move {
        loop {
            let frame = tokio::select! {
                biased;
                event = event_rx.recv() => match event {
                    Some(event) => match serde_json::to_string(&event) {
                        Ok(json) => Message::Text(json),
                        Err(e) => {
                            error!("Failed to serialize panel event: {}", e);
                            continue;
                        }
                    },
                    None => break,
                },
                ping = pong_rx.recv() => match ping {
                    Some(data) => Message::Pong(data),
                    None => break,
                },
            };
            if let Err(e) = ws_tx.send(frame).await {
                debug!("Writer stopped: {}", e);
                break;
            }
        }
    });

    let prompt_config = prompts.current();
    let session = Arc::new(
        Mutex::new(TurnController::new(agent, &prompt_config, ChatPanel::with_sink(event_tx.clone())))
    );

    while let Some(msg) = ws_rx.next().await {
        match msg {
            Ok(message) => {
                if message.len() > MAX_MESSAGE_SIZE {
                    warn!(
                        "Message from {} exceeds size limit ({} > {})",
                        peer,
                        message.len(),
                        MAX_MESSAGE_SIZE
                    );
                    let _ = event_tx.send(ServerMessage::Error {
                        message: "Message too large".to_string(),
                    });
                    break;
                }

                match message {
                    Message::Text(text) => {
                        match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(ClientMessage::Chat { content }) => {
                                match Arc::clone(&session).try_lock_owned() {
                                    Ok(mut turn) => {
                                        let peer_label = peer.to_string();
                                        tokio::spawn(async move {
                                            let started = Utc::now();
                                            let outcome = turn.submit(&content).await;
                                            let elapsed = Utc::now() - started;
                                            match outcome {
                                                TurnOutcome::Ignored => {
                                                    debug!("Blank submission from {} ignored", peer_label);
                                                }
                                                TurnOutcome::Replied(_) => {
                                                    info!(
                                                        "Turn for {} answered in {}ms",
                                                        peer_label,
                                                        elapsed.num_milliseconds()
                                                    );
                                                }
                                                TurnOutcome::Failed(_) => {
                                                    warn!(
                                                        "Turn for {} failed after {}ms",
                                                        peer_label,
                                                        elapsed.num_milliseconds()
                                                    );
                                                }
                                            }
                                        });
                                    }
                                    Err(_) => {
                                        warn!("Submission from {} rejected: a turn is still pending", peer);
                                        let _ = event_tx.send(ServerMessage::Busy);
                                    }
                                }
                            }
                            Err(e) => {
                                error!("Failed to parse message from {}: {}", peer, e);
                                let _ = event_tx.send(ServerMessage::Error {
                                    message: format!("Failed to parse message: {}", e),
                                });
                            }
                        }
                    }
                    Message::Close(_) => {
                        info!("Received close frame from {}", peer);
                        break;
                    }
                    Message::Ping(ping_data) => {
                        if pong_tx.send(ping_data).is_err() {
                            error!("Failed to send pong to {}", peer);
                            break;
                        }
                    }
                    Message::Pong(_) => {}
                    Message::Binary(_) => {
                        warn!("Ignoring binary message from {}", peer);
                    }
                    Message::Frame(_) => {}
                }
            }
            Err(e) => {
                match e {
                    | tokio_tungstenite::tungstenite::Error::ConnectionClosed
                    | tokio_tungstenite::tungstenite::Error::Protocol(_)
                    | tokio_tungstenite::tungstenite::Error::Utf8 => {
                        info!("WebSocket connection closed or protocol error for {}: {}", peer, e);
                    }
                    tokio_tungstenite::tungstenite::Error::Io(ref io_err) if
                        io_err.kind() == std::io::ErrorKind::ConnectionReset
                    => {
                        info!("WebSocket connection reset by peer {}", peer);
                    }
                    _ => {
                        error!("Error receiving message from {}: {}", peer, e);
                    }
                }
                break;
            }
        }
    }

    drop(event_tx);
    drop(pong_tx);
    drop(session);
    if tokio::time::timeout(WRITER_DRAIN_TIMEOUT, writer).await.is_err() {
        warn!("Writer for session {} did not drain in time", session_id);
    }
    info!("WebSocket connection closed for {} (Session ID: {})", peer, session_id);
}
