//! Broadcast Router: the four delivery primitives over the session registry.
//!
//! Delivery is best effort and independent per connection: a stale sender is
//! skipped, never retried, and messages already delivered to other targets
//! are not rolled back.

use crate::error::RouteError;
use crate::registry::SessionRegistry;
use crate::ws::protocol::Outbound;

/// Send one event to a single named participant.
pub fn send_direct(
    registry: &SessionRegistry,
    team: u32,
    name: &str,
    event: &Outbound,
) -> Result<(), RouteError> {
    let tx = registry
        .direct_sender(team, name)
        .ok_or_else(|| RouteError::NoSuchRecipient {
            team,
            name: name.to_string(),
        })?;
    let _ = tx.send(event.to_message());
    Ok(())
}

/// Send a raw text line to the admin console, if one is connected.
/// Admin output is untagged; only member clients speak the kind-prefixed
/// protocol.
pub fn send_admin(registry: &SessionRegistry, text: &str) {
    if let Some(tx) = registry.admin_sender() {
        let _ = tx.send(axum::extract::ws::Message::Text(text.to_string().into()));
    }
}

/// Send one event to every connection on a team, in a single pass over the
/// bucket's current order. An empty or unknown team is a legal no-op.
pub fn broadcast_team(registry: &SessionRegistry, team: u32, event: &Outbound) {
    let msg = event.to_message();
    for tx in registry.team_senders(team) {
        let _ = tx.send(msg.clone());
    }
}

/// Send one event to every connected member.
pub fn broadcast_all(registry: &SessionRegistry, event: &Outbound) {
    let msg = event.to_message();
    for tx in registry.member_senders() {
        let _ = tx.send(msg.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Identity;
    use axum::extract::ws::Message;
    use tokio::sync::mpsc;

    fn connect(registry: &SessionRegistry, team: u32, name: &str) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        registry.connect_member(
            &Identity {
                name: name.to_string(),
                team,
            },
            tx,
        );
        rx
    }

    fn next_text(rx: &mut mpsc::UnboundedReceiver<Message>) -> Option<String> {
        match rx.try_recv() {
            Ok(Message::Text(text)) => Some(text.as_str().to_string()),
            _ => None,
        }
    }

    #[test]
    fn team_broadcast_reaches_exactly_that_team() {
        let registry = SessionRegistry::new();
        let mut alice = connect(&registry, 1, "alice");
        let mut bob = connect(&registry, 1, "bob");
        let mut carol = connect(&registry, 2, "carol");

        broadcast_team(&registry, 1, &Outbound::Chat("alice: hi".into()));

        assert_eq!(next_text(&mut alice).as_deref(), Some("c:alice: hi"));
        assert_eq!(next_text(&mut bob).as_deref(), Some("c:alice: hi"));
        assert!(next_text(&mut carol).is_none());
    }

    #[test]
    fn empty_team_broadcast_is_a_noop() {
        let registry = SessionRegistry::new();
        broadcast_team(&registry, 7, &Outbound::Disable);
    }

    #[test]
    fn direct_send_to_absent_recipient_reports_no_such_recipient() {
        let registry = SessionRegistry::new();
        let err = send_direct(&registry, 1, "ghost", &Outbound::Hide).unwrap_err();
        assert!(matches!(
            err,
            RouteError::NoSuchRecipient { team: 1, ref name } if name == "ghost"
        ));
    }

    #[test]
    fn admin_send_without_admin_is_a_noop() {
        let registry = SessionRegistry::new();
        send_admin(&registry, "$ votes");
    }
}
