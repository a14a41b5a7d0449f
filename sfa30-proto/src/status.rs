//! Device status codes reported in the state byte of SHDLC responses.

/// Non-zero state byte of a MISO frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceStatus {
    /// Wrong data length for this command (too much or too little data).
    WrongDataLength,
    /// Unknown command.
    UnknownCommand,
    /// No access right for command.
    NoAccessRight,
    /// Illegal command parameter or parameter out of allowed range.
    IllegalParameter,
    /// No measurement data available.
    NoDataAvailable,
    /// Command not allowed in current state.
    WrongState,
    /// Internal error.
    InternalError,
    /// General error.
    GeneralError,
    /// Any other code.
    Unknown(u8),
}

impl DeviceStatus {
    /// Map a state byte; `0x00` means success and yields `None`.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0x00 => return None,
            0x01 => Self::WrongDataLength,
            0x02 => Self::UnknownCommand,
            0x03 => Self::NoAccessRight,
            0x04 => Self::IllegalParameter,
            0x20 => Self::NoDataAvailable,
            0x43 => Self::WrongState,
            0x44 => Self::InternalError,
            0x7F => Self::GeneralError,
            other => Self::Unknown(other),
        })
    }

    /// The raw state byte.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::WrongDataLength => 0x01,
            Self::UnknownCommand => 0x02,
            Self::NoAccessRight => 0x03,
            Self::IllegalParameter => 0x04,
            Self::NoDataAvailable => 0x20,
            Self::WrongState => 0x43,
            Self::InternalError => 0x44,
            Self::GeneralError => 0x7F,
            Self::Unknown(code) => code,
        }
    }

    /// Diagnostic message for logs.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::WrongDataLength => "wrong data length for this command",
            Self::UnknownCommand => "unknown command",
            Self::NoAccessRight => "no access right for command",
            Self::IllegalParameter => {
                "illegal command parameter or parameter out of allowed range"
            }
            Self::NoDataAvailable => "no measurement data available",
            Self::WrongState => "command not allowed in current state",
            Self::InternalError => "internal error",
            Self::GeneralError => "general error",
            Self::Unknown(_) => "unknown code",
        }
    }
}

impl core::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} (0x{:02X})", self.description(), self.code())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::string::ToString;

    #[test]
    fn test_success_is_none() {
        assert_eq!(DeviceStatus::from_code(0x00), None);
    }

    #[test]
    fn test_known_codes_round_trip() {
        for code in [0x01, 0x02, 0x03, 0x04, 0x20, 0x43, 0x44, 0x7F, 0x55] {
            let status = DeviceStatus::from_code(code).unwrap();
            assert_eq!(status.code(), code);
        }
        assert_eq!(DeviceStatus::from_code(0x55), Some(DeviceStatus::Unknown(0x55)));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            DeviceStatus::NoDataAvailable.to_string(),
            "no measurement data available (0x20)"
        );
    }
}
