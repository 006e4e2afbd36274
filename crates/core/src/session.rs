//! Consultation Session State Machine
//!
//! A `Session` is the sole owner of one conversation: its status, its message
//! history, and its voice indicators. All changes flow through
//! [`Session::apply`], which consumes an explicit [`SessionEvent`] and returns
//! the [`Command`]s the runtime must execute. The runtime (the WebSocket
//! handler in the api crate) owns the side effects: sending protocol frames,
//! dispatching vendor turns, and running the capture re-arm timer.
//!
//! Responses from spawned work re-enter the machine as events tagged with the
//! session generation they were issued under. Stale generations are dropped,
//! so a slow vendor reply can never land in a later conversation's history.

use crate::message::ChatMessage;

/// Delay between the assistant finishing speech and voice capture re-arming.
pub const CAPTURE_REARM_DELAY_MS: u64 = 1000;

/// Playback volume while unmuted. Muting sets volume to zero; it never
/// touches the connection status.
pub const UNMUTED_VOLUME: f32 = 0.8;

/// Connection lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Connecting,
    Connected,
    Disconnected,
}

/// Everything that can happen to a session, from user actions or from work
/// the runtime completed on the session's behalf.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The user pressed "start conversation".
    StartRequested,
    /// The handshake completed and the session is live.
    ConnectAcknowledged,
    /// The user submitted a turn, typed or transcribed.
    UserUtterance { text: String },
    /// A dispatched turn settled, successfully or through the fallback path.
    TurnSettled {
        generation: u64,
        text: String,
        audio_url: Option<String>,
    },
    /// Assistant speech playback began.
    SpeechStarted,
    /// Assistant speech playback finished.
    SpeechFinished,
    /// The re-arm timer fired.
    CaptureArmed { generation: u64 },
    /// The user toggled mute.
    MuteToggled,
    /// The user pressed "end conversation".
    EndRequested,
    /// The connection failed in a way the session cannot recover from.
    ConnectionLost { reason: String },
}

/// Side effects the runtime must carry out after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Begin the connection handshake for a new conversation.
    BeginHandshake { generation: u64 },
    /// Forward a newly appended message to the client.
    Publish { message: ChatMessage },
    /// Dispatch the user's turn to the conversational proxy or the fallback.
    SubmitTurn { generation: u64, text: String },
    /// Tell the client to start playing the assistant's synthesized speech.
    BeginSpeech,
    /// Start the cancellable capture re-arm timer.
    ScheduleCaptureRearm { generation: u64 },
    /// Cancel any scheduled or armed capture.
    CancelCapture,
    /// Tell the client that capture is armed and the assistant is listening.
    NotifyListening,
    /// Tell the client the session has ended.
    NotifyDisconnected,
    /// Adjust client playback volume after a mute toggle.
    SetVolume { volume: f32 },
}

/// One conversation instance. Single owner of its message list; nothing is
/// shared across sessions and nothing survives the end of one.
#[derive(Debug)]
pub struct Session {
    status: SessionStatus,
    muted: bool,
    speaking: bool,
    listening: bool,
    turn_in_flight: bool,
    generation: u64,
    messages: Vec<ChatMessage>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            status: SessionStatus::Idle,
            muted: false,
            speaking: false,
            listening: false,
            turn_in_flight: false,
            generation: 0,
            messages: Vec::new(),
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn muted(&self) -> bool {
        self.muted
    }

    pub fn speaking(&self) -> bool {
        self.speaking
    }

    pub fn listening(&self) -> bool {
        self.listening
    }

    pub fn turn_in_flight(&self) -> bool {
        self.turn_in_flight
    }

    /// The current session generation. Incremented on every start so that
    /// work issued under an earlier conversation can be fenced out.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Applies one event and returns the commands the runtime must execute.
    pub fn apply(&mut self, event: SessionEvent) -> Vec<Command> {
        match event {
            SessionEvent::StartRequested => self.on_start_requested(),
            SessionEvent::ConnectAcknowledged => self.on_connect_acknowledged(),
            SessionEvent::UserUtterance { text } => self.on_user_utterance(text),
            SessionEvent::TurnSettled {
                generation,
                text,
                audio_url,
            } => self.on_turn_settled(generation, text, audio_url),
            SessionEvent::SpeechStarted => self.on_speech_started(),
            SessionEvent::SpeechFinished => self.on_speech_finished(),
            SessionEvent::CaptureArmed { generation } => self.on_capture_armed(generation),
            SessionEvent::MuteToggled => self.on_mute_toggled(),
            SessionEvent::EndRequested => self.on_terminated(),
            SessionEvent::ConnectionLost { reason } => {
                tracing::warn!(%reason, "session connection lost");
                self.on_terminated()
            }
        }
    }

    fn on_start_requested(&mut self) -> Vec<Command> {
        match self.status {
            SessionStatus::Idle | SessionStatus::Disconnected => {
                self.generation += 1;
                self.status = SessionStatus::Connecting;
                self.speaking = false;
                self.listening = false;
                self.turn_in_flight = false;
                self.messages.clear();
                vec![Command::BeginHandshake {
                    generation: self.generation,
                }]
            }
            // Already connecting or connected; nothing to do.
            _ => vec![],
        }
    }

    fn on_connect_acknowledged(&mut self) -> Vec<Command> {
        if self.status != SessionStatus::Connecting {
            return vec![];
        }
        self.status = SessionStatus::Connected;
        vec![Command::ScheduleCaptureRearm {
            generation: self.generation,
        }]
    }

    fn on_user_utterance(&mut self, text: String) -> Vec<Command> {
        // At most one turn in flight: further input is ignored until the
        // pending turn settles.
        if self.status != SessionStatus::Connected || self.turn_in_flight {
            return vec![];
        }
        let message = ChatMessage::user(text.clone());
        self.messages.push(message.clone());
        self.turn_in_flight = true;
        self.listening = false;
        vec![
            Command::CancelCapture,
            Command::Publish { message },
            Command::SubmitTurn {
                generation: self.generation,
                text,
            },
        ]
    }

    fn on_turn_settled(
        &mut self,
        generation: u64,
        text: String,
        audio_url: Option<String>,
    ) -> Vec<Command> {
        // Fencing: a reply issued under an earlier conversation, or arriving
        // after the session ended, must not touch the history.
        if generation != self.generation || self.status != SessionStatus::Connected {
            tracing::debug!(
                settled = generation,
                current = self.generation,
                "dropping stale turn result"
            );
            return vec![];
        }
        self.turn_in_flight = false;
        let has_audio = audio_url.is_some();
        let message = ChatMessage::assistant(text, audio_url);
        self.messages.push(message.clone());
        let mut commands = vec![Command::Publish { message }];
        if has_audio {
            self.speaking = true;
            commands.push(Command::BeginSpeech);
        } else {
            // Silent turn: skip straight to re-arming capture.
            commands.push(Command::ScheduleCaptureRearm {
                generation: self.generation,
            });
        }
        commands
    }

    fn on_speech_started(&mut self) -> Vec<Command> {
        if self.status != SessionStatus::Connected {
            return vec![];
        }
        self.speaking = true;
        if self.listening {
            // Capture and assistant speech are mutually exclusive.
            self.listening = false;
            return vec![Command::CancelCapture];
        }
        vec![]
    }

    fn on_speech_finished(&mut self) -> Vec<Command> {
        if self.status != SessionStatus::Connected || !self.speaking {
            return vec![];
        }
        self.speaking = false;
        if !self.turn_in_flight && !self.listening {
            return vec![Command::ScheduleCaptureRearm {
                generation: self.generation,
            }];
        }
        vec![]
    }

    fn on_capture_armed(&mut self, generation: u64) -> Vec<Command> {
        // The timer only arms capture if the session it was scheduled for is
        // still the live one and nothing else claimed the floor meanwhile.
        if generation != self.generation
            || self.status != SessionStatus::Connected
            || self.speaking
            || self.listening
            || self.turn_in_flight
        {
            return vec![];
        }
        self.listening = true;
        vec![Command::NotifyListening]
    }

    fn on_mute_toggled(&mut self) -> Vec<Command> {
        self.muted = !self.muted;
        let volume = if self.muted { 0.0 } else { UNMUTED_VOLUME };
        vec![Command::SetVolume { volume }]
    }

    fn on_terminated(&mut self) -> Vec<Command> {
        match self.status {
            SessionStatus::Connecting | SessionStatus::Connected => {
                self.status = SessionStatus::Disconnected;
                self.speaking = false;
                self.listening = false;
                self.turn_in_flight = false;
                vec![Command::CancelCapture, Command::NotifyDisconnected]
            }
            _ => vec![],
        }
    }
}
