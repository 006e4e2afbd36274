//! Manages the WebSocket connection lifecycle for a consultation session.
//!
//! Each socket owns exactly one [`Session`]. Client frames and completed
//! background work are funneled through the state machine, and the commands
//! it returns are executed here: protocol frames out, turn tasks spawned,
//! and the capture re-arm timer scheduled or cancelled. Because turn results
//! and timer expirations re-enter the machine tagged with their generation,
//! a late vendor reply from an ended conversation is fenced out instead of
//! leaking into the next one.

use super::protocol::{ClientMessage, ServerMessage};
use crate::{proxy, state::AppState};
use anyhow::Result;
use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt, stream::SplitSink};
use std::{sync::Arc, time::Duration};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use vetvoice_core::{
    advisor,
    session::{CAPTURE_REARM_DELAY_MS, Command, Session, SessionEvent},
};

/// Axum handler to upgrade an HTTP connection to a WebSocket.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Entry point for a new connection.
#[instrument(name = "ws_session", skip_all, fields(session_id))]
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let session_id = Uuid::new_v4();
    tracing::Span::current().record("session_id", session_id.to_string());
    info!("New consultation socket connected.");

    if let Err(e) = run_session(socket, state).await {
        error!(error = ?e, "Session terminated with error.");
    }
    info!("Consultation socket closed.");
}

/// Background tasks owned by one session. Both are aborted when superseded
/// and when the socket closes.
#[derive(Default)]
struct SessionTasks {
    rearm: Option<JoinHandle<()>>,
    turn: Option<JoinHandle<()>>,
}

impl SessionTasks {
    fn cancel_rearm(&mut self) {
        if let Some(handle) = self.rearm.take() {
            handle.abort();
        }
    }

    fn abort_all(&mut self) {
        self.cancel_rearm();
        if let Some(handle) = self.turn.take() {
            handle.abort();
        }
    }
}

/// The main event loop for an active socket.
async fn run_session(socket: WebSocket, state: Arc<AppState>) -> Result<()> {
    let (mut socket_tx, mut socket_rx) = socket.split();
    // Turn results, timer expirations, and handshake acknowledgments re-enter
    // the state machine through this channel.
    let (event_tx, mut event_rx) = mpsc::channel::<SessionEvent>(32);

    let mut session = Session::new();
    let mut tasks = SessionTasks::default();

    loop {
        tokio::select! {
            maybe_frame = socket_rx.next() => {
                match maybe_frame {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(client_msg) => {
                                let event = client_event(client_msg);
                                let commands = session.apply(event);
                                execute_commands(
                                    commands, &session, &state,
                                    &mut socket_tx, &event_tx, &mut tasks,
                                ).await?;
                            }
                            Err(e) => {
                                warn!(error = %e, "Ignoring malformed client frame");
                                send_msg(&mut socket_tx, ServerMessage::Error {
                                    message: "Unrecognized message".to_string(),
                                }).await?;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!("Client closed the socket.");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        error!(error = ?e, "Error receiving from client socket");
                        break;
                    }
                }
            },
            Some(event) = event_rx.recv() => {
                let commands = session.apply(event);
                execute_commands(
                    commands, &session, &state,
                    &mut socket_tx, &event_tx, &mut tasks,
                ).await?;
            },
        }
    }

    // The session dies with its socket; no pending work may outlive it.
    tasks.abort_all();
    Ok(())
}

/// Maps a protocol frame to a state machine event.
fn client_event(msg: ClientMessage) -> SessionEvent {
    match msg {
        ClientMessage::Start => SessionEvent::StartRequested,
        ClientMessage::UserMessage { text } => SessionEvent::UserUtterance { text },
        ClientMessage::ToggleMute => SessionEvent::MuteToggled,
        ClientMessage::PlaybackStarted => SessionEvent::SpeechStarted,
        ClientMessage::PlaybackFinished => SessionEvent::SpeechFinished,
        ClientMessage::End => SessionEvent::EndRequested,
    }
}

/// Executes the commands returned by one state transition.
async fn execute_commands(
    commands: Vec<Command>,
    session: &Session,
    state: &Arc<AppState>,
    socket_tx: &mut SplitSink<WebSocket, Message>,
    event_tx: &mpsc::Sender<SessionEvent>,
    tasks: &mut SessionTasks,
) -> Result<()> {
    for command in commands {
        match command {
            Command::BeginHandshake { generation } => {
                // No vendor session socket is dialed: session setup is local,
                // so the handshake is acknowledged immediately.
                send_msg(socket_tx, ServerMessage::Connected { generation }).await?;
                let _ = event_tx.send(SessionEvent::ConnectAcknowledged).await;
            }
            Command::Publish { message } => {
                send_msg(socket_tx, ServerMessage::Message { message }).await?;
            }
            Command::SubmitTurn { generation, text } => {
                let state = state.clone();
                let event_tx = event_tx.clone();
                tasks.turn = Some(tokio::spawn(async move {
                    let (reply, audio_url) = answer_turn(&state, &text).await;
                    let _ = event_tx
                        .send(SessionEvent::TurnSettled {
                            generation,
                            text: reply,
                            audio_url,
                        })
                        .await;
                }));
            }
            Command::BeginSpeech => {
                send_msg(socket_tx, ServerMessage::SpeakingStarted).await?;
            }
            Command::ScheduleCaptureRearm { generation } => {
                tasks.cancel_rearm();
                let event_tx = event_tx.clone();
                tasks.rearm = Some(tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_millis(CAPTURE_REARM_DELAY_MS)).await;
                    let _ = event_tx.send(SessionEvent::CaptureArmed { generation }).await;
                }));
            }
            Command::CancelCapture => tasks.cancel_rearm(),
            Command::NotifyListening => {
                send_msg(socket_tx, ServerMessage::Listening).await?;
            }
            Command::NotifyDisconnected => {
                send_msg(socket_tx, ServerMessage::Disconnected).await?;
            }
            Command::SetVolume { volume } => {
                send_msg(
                    socket_tx,
                    ServerMessage::MuteChanged {
                        muted: session.muted(),
                        volume,
                    },
                )
                .await?;
            }
        }
    }
    Ok(())
}

/// Produces the assistant's reply for one turn.
///
/// Prefers the live vendor; when no vendor is configured, or the vendor turn
/// fails, the scripted advisor answers instead, so the user always receives
/// a complete in-character reply.
async fn answer_turn(state: &Arc<AppState>, text: &str) -> (String, Option<String>) {
    if let Some(vendor) = &state.vendor {
        match proxy::run_chat_turn(
            vendor.as_ref(),
            &state.config.agent_id,
            text,
            &state.config.voice_id,
        )
        .await
        {
            Ok(turn) => return (turn.response, turn.audio_url),
            Err(err) => {
                warn!(error = ?err, "Vendor turn failed, answering from the scripted advisor");
            }
        }
    }
    (advisor::generate(text).to_string(), None)
}

/// A helper function to serialize and send a `ServerMessage` to the client.
pub(crate) async fn send_msg(
    socket_tx: &mut SplitSink<WebSocket, Message>,
    msg: ServerMessage,
) -> Result<()> {
    let serialized = serde_json::to_string(&msg)?;
    socket_tx.send(Message::Text(serialized.into())).await?;
    Ok(())
}
