//! Link events from the gateway
//!
//! Every complete inbound line maps to exactly one event: a connection
//! notification, a disconnection, a decoded command, or noise. Gateway
//! chatter that matches nothing is surfaced as `Unrecognized` so the
//! caller can log and drop it without ever answering it.

use heapless::String;

use crate::command::Command;

/// Maximum stored identity length (a peer address string)
pub const MAX_IDENTITY_LEN: usize = 24;

/// Connected peer identity as reported by the gateway
pub type Identity = String<MAX_IDENTITY_LEN>;

/// A decoded inbound line
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    /// A client connected; carries the peer identity
    Connected(Identity),
    /// The client disconnected
    Disconnected,
    /// A remote command from the connected client
    Command(Command),
    /// Line matched nothing; log and drop
    Unrecognized,
}

/// Decode one complete line into a link event
///
/// An over-long identity is truncated; truncation is deterministic, so the
/// derived owner key stays stable for a given peer.
pub fn parse_event(line: &str) -> LinkEvent {
    if let Some(identity) = line.strip_prefix("+CONN:") {
        let mut stored = Identity::new();
        for c in identity.chars().take(MAX_IDENTITY_LEN) {
            if stored.push(c).is_err() {
                break;
            }
        }
        return LinkEvent::Connected(stored);
    }

    if line == "+DISC" {
        return LinkEvent::Disconnected;
    }

    match Command::parse(line) {
        Some(cmd) => LinkEvent::Command(cmd),
        None => LinkEvent::Unrecognized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Posture;

    #[test]
    fn test_connect_event() {
        match parse_event("+CONN:AA:BB:CC:DD:EE:FF") {
            LinkEvent::Connected(id) => assert_eq!(id.as_str(), "AA:BB:CC:DD:EE:FF"),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_connect_with_empty_identity() {
        match parse_event("+CONN:") {
            LinkEvent::Connected(id) => assert!(id.is_empty()),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_overlong_identity_truncated() {
        let line = "+CONN:0123456789012345678901234567890123456789";
        match parse_event(line) {
            LinkEvent::Connected(id) => assert_eq!(id.len(), MAX_IDENTITY_LEN),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_disconnect_event() {
        assert_eq!(parse_event("+DISC"), LinkEvent::Disconnected);
    }

    #[test]
    fn test_command_events() {
        assert_eq!(
            parse_event("Sit"),
            LinkEvent::Command(Command::Manual(Posture::Sit))
        );
        assert_eq!(
            parse_event("AUTO2"),
            LinkEvent::Command(Command::Auto { slot: 2 })
        );
    }

    #[test]
    fn test_noise_is_unrecognized() {
        assert_eq!(parse_event("OK"), LinkEvent::Unrecognized);
        assert_eq!(parse_event("+READY"), LinkEvent::Unrecognized);
        assert_eq!(parse_event("garbage"), LinkEvent::Unrecognized);
    }
}
