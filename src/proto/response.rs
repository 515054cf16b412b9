use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};
use std::{fmt, io, str};

use super::command::{OutputLoad, OutputState, RunMode};

/// Responses are single ASCII lines terminated by LINE FEED (0x0A),
/// with an optional CARRIAGE RETURN before it. Which line belongs to
/// which query is decided by the codec from the last command sent.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// `*OPC?` acknowledgment, trimmed.
    OperationComplete(String),
    State(RunState),
    Id(Ident),
    Mode(RunMode),
    SampleRate(f64),
    Output(OutputState),
    Load(OutputLoad),
    Voltage(f64),
    Count(u64),
    Waveform(String),
}

/// Run state reported by `AWGControl:RSTATe?`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, TryFromPrimitive, Serialize, Deserialize)]
#[repr(u8)]
pub enum RunState {
    Stopped = 0,
    WaitingForTrigger = 1,
    Running = 2,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Stopped => f.write_str("stopped"),
            RunState::WaitingForTrigger => f.write_str("waiting for trigger"),
            RunState::Running => f.write_str("running"),
        }
    }
}

impl TryFrom<&[u8]> for RunState {
    type Error = io::Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let code: u8 = text(value)?
            .trim()
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("{}", e)))?;
        RunState::try_from(code)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
    }
}

/// `*IDN?` identification, four comma-separated fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ident {
    pub manufacturer: String,
    pub model: String,
    pub serial: String,
    pub firmware: String,
}

impl TryFrom<&[u8]> for Ident {
    type Error = io::Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let value = text(value)?;
        let values: Vec<&str> = value.split(',').collect();
        if values.len() == 4 {
            Ok(Self {
                manufacturer: String::from(values[0]),
                model: String::from(values[1]),
                serial: String::from(values[2]),
                firmware: String::from(values[3].trim()),
            })
        } else {
            Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid data for IDN response: {}", value),
            ))
        }
    }
}

pub(crate) fn text(line: &[u8]) -> io::Result<&str> {
    str::from_utf8(line).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

pub(crate) fn parse_f64(line: &[u8]) -> io::Result<f64> {
    text(line)?
        .trim()
        .parse()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("{}", e)))
}

pub(crate) fn parse_u64(line: &[u8]) -> io::Result<u64> {
    text(line)?
        .trim()
        .parse()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("{}", e)))
}

/// Waveform names come back quoted; strip the quotes.
pub(crate) fn parse_name(line: &[u8]) -> io::Result<String> {
    Ok(text(line)?.trim().trim_matches('"').to_string())
}
