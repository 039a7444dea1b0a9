//! Inbound commands to a fan channel.
//!
//! These are the already-decoded values of the bus inputs; decoding from
//! the wire is the bus adapter's job.

/// Commands that external adapters can send into one fan channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChannelCommand {
    /// Absolute speed level.
    Level(u8),

    /// Relative speed step (+1 / −1).
    LevelStep { up: bool },

    /// Manual/automatic switch; only honoured when the channel's operating
    /// mode is configured as bus-switchable.
    OperatingModeSwitch { automatic: bool },

    /// Raw ventilation mode index; only honoured when the channel's
    /// ventilation mode is configured as bus-switchable.
    VentilationMode(u8),

    InsideTemperature(f32),
    InsideHumidity(f32),
    OutsideTemperature(f32),
    OutsideHumidity(f32),

    /// Arm (`true`) or cancel (`false`) the auto-stop countdown.
    Timer { enable: bool },
}
