//! Message types for the scoreboard link
//!
//! - Host → Board: game snapshots, backlight commands, lifecycle requests
//! - Board → Host: heartbeat replies and status counters

use scoreboard_core::brightness::BrightnessCommand;
use scoreboard_core::feed::GameSnapshot;

use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};

// Message type IDs: Host → Board
pub const MSG_SNAPSHOT: u8 = 0x01;
pub const MSG_BRIGHTNESS: u8 = 0x02;
pub const MSG_DISPLAYS_OFF: u8 = 0x03;
pub const MSG_SHUTDOWN: u8 = 0x04;
pub const MSG_PING: u8 = 0x05;

// Message type IDs: Board → Host
pub const MSG_PONG: u8 = 0x81;
pub const MSG_STATUS: u8 = 0x82;

/// Panel byte addressing every backlight
const PANEL_ALL: u8 = 0xFF;

/// Flag bit in the brightness payload
const FLAG_FORCE_JUMP: u8 = 0x01;

/// Which backlight a brightness command is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelSelect {
    One(u8),
    All,
}

impl PanelSelect {
    fn from_byte(byte: u8) -> Self {
        match byte {
            PANEL_ALL => PanelSelect::All,
            n => PanelSelect::One(n),
        }
    }

    fn to_byte(self) -> u8 {
        match self {
            PanelSelect::One(n) => n,
            PanelSelect::All => PANEL_ALL,
        }
    }

    /// True if this selection includes panel `index`
    pub fn includes(self, index: usize) -> bool {
        match self {
            PanelSelect::One(n) => n as usize == index,
            PanelSelect::All => true,
        }
    }
}

/// Messages from the host to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostMessage {
    /// Current game state
    Snapshot(GameSnapshot),
    /// Backlight command
    Brightness {
        panel: PanelSelect,
        command: BrightnessCommand,
    },
    /// Blank every segment unit
    DisplaysOff,
    /// Stop every controller and release the hardware
    Shutdown,
    /// Heartbeat request
    Ping,
}

impl HostMessage {
    /// Decode a host message from a frame
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        match frame.msg_type {
            MSG_SNAPSHOT => postcard::from_bytes(&frame.payload)
                .map(HostMessage::Snapshot)
                .map_err(|_| FrameError::InvalidPayload),
            MSG_BRIGHTNESS => match frame.payload[..] {
                [panel, lower, upper, flags] => {
                    let command = BrightnessCommand::new(lower, upper, flags & FLAG_FORCE_JUMP != 0)
                        .map_err(|_| FrameError::InvalidPayload)?;
                    Ok(HostMessage::Brightness {
                        panel: PanelSelect::from_byte(panel),
                        command,
                    })
                }
                _ => Err(FrameError::InvalidPayload),
            },
            MSG_DISPLAYS_OFF => Ok(HostMessage::DisplaysOff),
            MSG_SHUTDOWN => Ok(HostMessage::Shutdown),
            MSG_PING => Ok(HostMessage::Ping),
            other => Err(FrameError::UnknownType(other)),
        }
    }

    /// Encode this message into a frame (host side and tests)
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            HostMessage::Snapshot(snapshot) => {
                let mut buffer = [0u8; MAX_PAYLOAD_SIZE];
                let used = postcard::to_slice(snapshot, &mut buffer)
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                Frame::new(MSG_SNAPSHOT, used)
            }
            HostMessage::Brightness { panel, command } => {
                let flags = if command.force_jump() {
                    FLAG_FORCE_JUMP
                } else {
                    0
                };
                Frame::new(
                    MSG_BRIGHTNESS,
                    &[panel.to_byte(), command.lower(), command.upper(), flags],
                )
            }
            HostMessage::DisplaysOff => Ok(Frame::empty(MSG_DISPLAYS_OFF)),
            HostMessage::Shutdown => Ok(Frame::empty(MSG_SHUTDOWN)),
            HostMessage::Ping => Ok(Frame::empty(MSG_PING)),
        }
    }
}

/// Board error counters reported to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardStatus {
    /// Failed segment writes since boot
    pub bus_errors: u32,
    /// Snapshot fields deferred because the update queue was full
    pub deferred_updates: u32,
}

/// Messages from the board to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoardMessage {
    /// Heartbeat reply
    Pong,
    /// Error counters
    Status(BoardStatus),
}

impl BoardMessage {
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            BoardMessage::Pong => Ok(Frame::empty(MSG_PONG)),
            BoardMessage::Status(status) => {
                let mut payload = [0u8; 8];
                payload[..4].copy_from_slice(&status.bus_errors.to_le_bytes());
                payload[4..].copy_from_slice(&status.deferred_updates.to_le_bytes());
                Frame::new(MSG_STATUS, &payload)
            }
        }
    }

    /// Decode a board message (host side and tests)
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        match frame.msg_type {
            MSG_PONG => Ok(BoardMessage::Pong),
            MSG_STATUS => {
                let bytes: [u8; 8] = frame
                    .payload
                    .as_slice()
                    .try_into()
                    .map_err(|_| FrameError::InvalidPayload)?;
                let [a, b, c, d, e, f, g, h] = bytes;
                Ok(BoardMessage::Status(BoardStatus {
                    bus_errors: u32::from_le_bytes([a, b, c, d]),
                    deferred_updates: u32::from_le_bytes([e, f, g, h]),
                }))
            }
            other => Err(FrameError::UnknownType(other)),
        }
    }
}
