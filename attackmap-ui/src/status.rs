use attackmap_messages::TransportStatus;
use eframe::egui::{Color32, Label, Response, RichText, Ui, Widget};

/// What the status line shows about the feed connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedStatus {
    Awaiting,
    Established,
    Lost,
    Failed,
    /// The feed finished and will not reconnect.
    Ended,
    /// Attacks are arriving.
    Live,
}

impl FeedStatus {
    /// Apply a transport lifecycle signal.
    ///
    /// A connect error only replaces the initial message; once the feed has
    /// been seen, reconnection is left to the transport.
    pub fn apply(&self, signal: &TransportStatus) -> FeedStatus {
        match (self, signal) {
            (Self::Awaiting | Self::Lost | Self::Failed, TransportStatus::Connected) => {
                Self::Established
            }
            (_, TransportStatus::Disconnected) => Self::Lost,
            (_, TransportStatus::Ended) => Self::Ended,
            (Self::Awaiting, TransportStatus::ConnectError(_)) => Self::Failed,
            (current, _) => current.clone(),
        }
    }

    /// First attack clears a waiting message.
    pub fn on_attack(&self) -> FeedStatus {
        match self {
            Self::Awaiting | Self::Established => Self::Live,
            current => current.clone(),
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Awaiting => "Awaiting connection...",
            Self::Established => "Connection established. Waiting for data...",
            Self::Lost => "Connection lost. Attempting to reconnect...",
            Self::Failed => "Failed to connect to the server. Is it running?",
            Self::Ended => "Feed ended.",
            Self::Live => "Live",
        }
    }

    fn color(&self) -> Color32 {
        match self {
            Self::Awaiting | Self::Ended => Color32::GRAY,
            Self::Established | Self::Live => Color32::from_rgb(34, 197, 94),
            Self::Lost => Color32::from_rgb(234, 179, 8),
            Self::Failed => Color32::from_rgb(239, 68, 68),
        }
    }
}

impl Widget for &FeedStatus {
    fn ui(self, ui: &mut Ui) -> Response {
        ui.add(Label::new(RichText::new(self.message()).color(self.color())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_then_first_attack() {
        let status = FeedStatus::Awaiting.apply(&TransportStatus::Connected);
        assert_eq!(status, FeedStatus::Established);
        assert_eq!(status.on_attack(), FeedStatus::Live);
    }

    #[test]
    fn test_connect_error_only_replaces_initial_message() {
        let error = TransportStatus::ConnectError("refused".to_string());
        assert_eq!(FeedStatus::Awaiting.apply(&error), FeedStatus::Failed);
        assert_eq!(FeedStatus::Lost.apply(&error), FeedStatus::Lost);
        assert_eq!(FeedStatus::Live.apply(&error), FeedStatus::Live);
    }

    #[test]
    fn test_late_connect_after_failure() {
        let failed = FeedStatus::Awaiting.apply(&TransportStatus::ConnectError("refused".into()));
        assert_eq!(failed.apply(&TransportStatus::Connected), FeedStatus::Established);
    }

    #[test]
    fn test_disconnect_and_reconnect() {
        let lost = FeedStatus::Live.apply(&TransportStatus::Disconnected);
        assert_eq!(lost, FeedStatus::Lost);
        assert_eq!(lost.message(), "Connection lost. Attempting to reconnect...");
        assert_eq!(lost.on_attack(), FeedStatus::Lost);
        assert_eq!(lost.apply(&TransportStatus::Connected), FeedStatus::Established);
    }

    #[test]
    fn test_end_of_feed_does_not_promise_reconnect() {
        let ended = FeedStatus::Live.apply(&TransportStatus::Ended);
        assert_eq!(ended, FeedStatus::Ended);
        assert_eq!(ended.message(), "Feed ended.");
        assert!(!ended.message().contains("reconnect"));
        assert_eq!(ended.on_attack(), FeedStatus::Ended);
        assert_eq!(
            ended.apply(&TransportStatus::ConnectError("refused".to_string())),
            FeedStatus::Ended
        );
    }

    #[test]
    fn test_attack_clears_awaiting() {
        assert_eq!(FeedStatus::Awaiting.on_attack(), FeedStatus::Live);
        assert_eq!(FeedStatus::Failed.on_attack(), FeedStatus::Failed);
    }

    #[test]
    fn test_connected_while_live_is_unchanged() {
        assert_eq!(
            FeedStatus::Live.apply(&TransportStatus::Connected),
            FeedStatus::Live
        );
    }
}
