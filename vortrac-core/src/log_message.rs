//! Structured progress/status messages the coordinator emits alongside
//! ordinary `log` crate diagnostics.
//!
//! Grounded on `original_source/trunk/IO/Message.h`'s `Message` class: same
//! fields (log text, progress percent, location, stoplight color, storm
//! signal status, storm signal message), minus the Qt signal/slot plumbing
//! that delivered them to a GUI. No control flow in `vortrac-core` depends
//! on a `LogMessage` being read; it's an observability side channel, same
//! as the legacy class's role.

/// A coarse status indicator for UI/dashboard consumers, carried verbatim
/// from `Message::StopLightColor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopLightColor {
    AllOff,
    BlinkRed,
    Red,
    BlinkYellow,
    Yellow,
    BlinkGreen,
    #[default]
    Green,
    AllOn,
}

/// Whether the storm's intensity appears to be changing rapidly, carried
/// verbatim from `Message::StormSignalStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StormSignalStatus {
    RapidIncrease,
    RapidDecrease,
    #[default]
    Ok,
}

/// One structured progress/status message emitted by the coordinator.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LogMessage {
    pub text: String,
    /// Milestone percent complete for the current volume, 0-100.
    pub progress: u8,
    /// Which pipeline stage emitted this message (e.g. "gbvtd", "hvvp").
    pub location: String,
    pub color: StopLightColor,
    pub stoplight_message: String,
    pub status: StormSignalStatus,
    pub storm_signal_message: String,
}

impl LogMessage {
    pub fn new(text: impl Into<String>, progress: u8, location: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            progress,
            location: location.into(),
            ..Default::default()
        }
    }

    pub fn with_stoplight(mut self, color: StopLightColor, message: impl Into<String>) -> Self {
        self.color = color;
        self.stoplight_message = message.into();
        self
    }

    pub fn with_storm_signal(mut self, status: StormSignalStatus, message: impl Into<String>) -> Self {
        self.status = status;
        self.storm_signal_message = message.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_legacy_green_ok() {
        let msg = LogMessage::new("starting volume", 0, "coordinator");
        assert_eq!(msg.color, StopLightColor::Green);
        assert_eq!(msg.status, StormSignalStatus::Ok);
    }

    #[test]
    fn builders_override_defaults() {
        let msg = LogMessage::new("hvvp unavailable", 40, "hvvp")
            .with_stoplight(StopLightColor::Yellow, "falling back to original closure");
        assert_eq!(msg.color, StopLightColor::Yellow);
        assert_eq!(msg.stoplight_message, "falling back to original closure");
    }
}
