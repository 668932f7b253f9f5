//! Outbound wire protocol: tagged `"<kind>:<payload>"` strings.
//!
//! The tag is a routing hint interpreted by the receiving client; the server
//! models each event as a variant and serializes to the wire form only at
//! send time.

use axum::extract::ws::Message;

/// One outbound event to a member client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Poll definition; payload is the poll JSON array.
    Form(String),
    /// Chat line.
    Chat(String),
    /// Image URL to render in the chat pane.
    Image(String),
    /// Disable the client's input controls.
    Disable,
    /// Re-enable the client's input controls.
    Show,
    /// Clear the client's chat pane.
    ClearChat,
    /// Countdown timer value.
    Timer(String),
    /// Pre-rendered scoreboard fragment.
    Score(String),
    /// Switch the client into representative mode (hide the chatbox).
    Hide,
}

impl Outbound {
    fn kind(&self) -> &'static str {
        match self {
            Outbound::Form(_) => "form",
            Outbound::Chat(_) => "c",
            Outbound::Image(_) => "img",
            Outbound::Disable => "disable",
            Outbound::Show => "show",
            Outbound::ClearChat => "clearchat",
            Outbound::Timer(_) => "timer",
            Outbound::Score(_) => "score",
            Outbound::Hide => "hide",
        }
    }

    fn payload(&self) -> &str {
        match self {
            Outbound::Form(p)
            | Outbound::Chat(p)
            | Outbound::Image(p)
            | Outbound::Timer(p)
            | Outbound::Score(p) => p,
            Outbound::Disable | Outbound::Show | Outbound::ClearChat | Outbound::Hide => "",
        }
    }

    /// Wire encoding: `"<kind>:<payload>"`.
    pub fn encode(&self) -> String {
        format!("{}:{}", self.kind(), self.payload())
    }

    /// WebSocket text message carrying the wire encoding.
    pub fn to_message(&self) -> Message {
        Message::Text(self.encode().into())
    }
}
