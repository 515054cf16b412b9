use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ProtoError;

/// Output channel of the generator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channel {
    One,
    Two,
}

impl Channel {
    /// Channel index as embedded in the command strings.
    pub fn index(self) -> u8 {
        match self {
            Channel::One => 1,
            Channel::Two => 2,
        }
    }
}

impl Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.index())
    }
}

impl TryFrom<u8> for Channel {
    type Error = ProtoError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Channel::One),
            2 => Ok(Channel::Two),
            other => Err(ProtoError::InvalidValue {
                what: "channel",
                value: other.to_string(),
            }),
        }
    }
}

/// Sequencer run mode (`AWGControl:RMODe`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunMode {
    /// Loop every entry and repeat the sequence circularly.
    Continuous,
    /// Wait for a trigger, then repeat the sequence Burst Count times.
    Burst,
    /// Wait for a trigger, then repeat the sequence circularly.
    TriggeredContinuous,
    /// Wait for a trigger before each sequencer entry.
    Stepped,
    /// Sequence flow controlled by jump commands.
    Advanced,
}

impl Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunMode::Continuous => f.write_str("CONT"),
            RunMode::Burst => f.write_str("BURS"),
            RunMode::TriggeredContinuous => f.write_str("TCON"),
            RunMode::Stepped => f.write_str("STEP"),
            RunMode::Advanced => f.write_str("ADVA"),
        }
    }
}

impl FromStr for RunMode {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CONT" | "CONTINUOUS" => Ok(RunMode::Continuous),
            "BURS" | "BURST" => Ok(RunMode::Burst),
            "TCON" | "TCONTINUOUS" => Ok(RunMode::TriggeredContinuous),
            "STEP" | "STEPPED" => Ok(RunMode::Stepped),
            "ADVA" | "ADVANCED" => Ok(RunMode::Advanced),
            _ => Err(ProtoError::InvalidValue {
                what: "run mode",
                value: s.to_string(),
            }),
        }
    }
}

/// Method for specifying voltage ranges on the display
/// (`DISPlay:UNIT:VOLT`): amplitude/offset or high/low levels.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayUnit {
    Amplitude,
    HighLow,
}

impl Display for DisplayUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayUnit::Amplitude => f.write_str("AMPL"),
            DisplayUnit::HighLow => f.write_str("HIGH"),
        }
    }
}

impl FromStr for DisplayUnit {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AMPL" | "AMPLITUDE" => Ok(DisplayUnit::Amplitude),
            "HIGH" => Ok(DisplayUnit::HighLow),
            _ => Err(ProtoError::InvalidValue {
                what: "display unit",
                value: s.to_string(),
            }),
        }
    }
}

/// Channel output state (`OUTPut<n>:STATe`), ON or OFF on the wire.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputState {
    On,
    Off,
}

impl OutputState {
    pub fn is_on(self) -> bool {
        matches!(self, OutputState::On)
    }
}

impl From<bool> for OutputState {
    fn from(on: bool) -> Self {
        if on {
            OutputState::On
        } else {
            OutputState::Off
        }
    }
}

impl Display for OutputState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputState::On => f.write_str("ON"),
            OutputState::Off => f.write_str("OFF"),
        }
    }
}

impl FromStr for OutputState {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ON" | "1" | "TRUE" => Ok(OutputState::On),
            "OFF" | "0" | "FALSE" => Ok(OutputState::Off),
            _ => Err(ProtoError::InvalidValue {
                what: "output state",
                value: s.to_string(),
            }),
        }
    }
}

/// Expected load on a channel output (`OUTPut<n>:SERIESIMPedance`).
///
/// The output impedance itself is always 50 Ohm; this setting corrects the
/// displayed voltage for unmatched loads. The low-impedance correction is
/// spelled `LOW` on the wire.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputLoad {
    FiftyOhm,
    Low,
}

impl Display for OutputLoad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputLoad::FiftyOhm => f.write_str("50Ohm"),
            OutputLoad::Low => f.write_str("LOW"),
        }
    }
}

impl FromStr for OutputLoad {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "50OHM" | "50" => Ok(OutputLoad::FiftyOhm),
            "LOW" => Ok(OutputLoad::Low),
            _ => Err(ProtoError::InvalidValue {
                what: "output load",
                value: s.to_string(),
            }),
        }
    }
}

/// Voltage level argument for amplitude/offset: a value in volts or one of
/// the instrument sentinels.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum Level {
    Volts(f64),
    Min,
    Max,
    Default,
}

impl From<f64> for Level {
    fn from(volts: f64) -> Self {
        Level::Volts(volts)
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Volts(v) => write!(f, "{}", v),
            Level::Min => f.write_str("MIN"),
            Level::Max => f.write_str("MAX"),
            Level::Default => f.write_str("DEF"),
        }
    }
}

impl FromStr for Level {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MIN" | "MINIMUM" => Ok(Level::Min),
            "MAX" | "MAXIMUM" => Ok(Level::Max),
            "DEF" | "DEFAULT" => Ok(Level::Default),
            other => other
                .parse()
                .map(Level::Volts)
                .map_err(|_| ProtoError::InvalidValue {
                    what: "voltage level",
                    value: s.to_string(),
                }),
        }
    }
}

/// Sequence element length: a sample count or one of the instrument
/// sentinels (`DEF` is 2048 samples).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementLength {
    Samples(u64),
    Min,
    Max,
    Default,
}

impl From<u64> for ElementLength {
    fn from(samples: u64) -> Self {
        ElementLength::Samples(samples)
    }
}

impl Display for ElementLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementLength::Samples(n) => write!(f, "{}", n),
            ElementLength::Min => f.write_str("MIN"),
            ElementLength::Max => f.write_str("MAX"),
            ElementLength::Default => f.write_str("DEF"),
        }
    }
}

/// Sequence element repetition count, `INF` for endless repetition.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopCount {
    Times(u64),
    Min,
    Max,
    Default,
    Infinite,
}

impl From<u64> for LoopCount {
    fn from(times: u64) -> Self {
        LoopCount::Times(times)
    }
}

impl Display for LoopCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoopCount::Times(n) => write!(f, "{}", n),
            LoopCount::Min => f.write_str("MIN"),
            LoopCount::Max => f.write_str("MAX"),
            LoopCount::Default => f.write_str("DEF"),
            LoopCount::Infinite => f.write_str("INF"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Command {
    Run,
    Stop,
    Trigger,
    QueryRunState,
    QueryIdent,
    QueryOperationComplete,
    QueryRunMode,
    SetRunMode(RunMode),
    QuerySampleRate,
    SetSampleRate(f64),
    SetDisplayUnit(DisplayUnit),
    QueryOutput(Channel),
    SetOutput(Channel, OutputState),
    QueryOutputLoad(Channel),
    SetOutputLoad(Channel, OutputLoad),
    QueryVoltageHigh(Channel),
    SetVoltageHigh(Channel, f64),
    QueryVoltageLow(Channel),
    SetVoltageLow(Channel, f64),
    QueryAmplitude(Channel),
    SetAmplitude(Channel, Level),
    QueryOffset(Channel),
    SetOffset(Channel, Level),
    QueryLength,
    SetLength(ElementLength),
    QueryLoopCount,
    SetLoopCount(LoopCount),
    QueryWaveform(Channel),
    SetWaveform(Channel, String),
    DownloadName(String),
    DownloadData(String),
    DeleteWaveform(String),
    ImportWaveform { name: String, path: String },
}
