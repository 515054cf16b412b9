use bytes::BytesMut;
use std::{
    fmt::{self, Write},
    io::{self},
};
use tokio_util::codec::{Decoder, Encoder};

use crate::proto::command::Command;
use crate::proto::response::{self, Ident, Response, RunState};
use crate::waveform;

const TERMINATOR: u8 = b'\n';

/// Line codec for the SCPI channel. Commands go out as one ASCII line;
/// query responses come back as one ASCII line. The instrument does not
/// tag responses, so the decoder keeps the last sent command to know how
/// to type the next line.
#[derive(Default)]
pub struct ScpiCodec {
    last_cmd: Option<Command>,
}

impl Decoder for ScpiCodec {
    type Item = Response;
    // We use io::Error here instead of our own Error type because for the
    // low level protocol a malformed line is an I/O-class failure; mapping
    // it onto the driver taxonomy is up to a higher level.
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let pos = match src.iter().position(|b| *b == TERMINATOR) {
            Some(pos) => pos,
            None => return Ok(None),
        };
        let line = src.split_to(pos + 1);
        let mut line = &line[..pos];
        if line.last() == Some(&b'\r') {
            line = &line[..line.len() - 1];
        }

        match self.last_cmd {
            Some(Command::QueryOperationComplete) => Ok(Some(Response::OperationComplete(
                response::text(line)?.trim().to_string(),
            ))),
            Some(Command::QueryRunState) => {
                Ok(Some(Response::State(RunState::try_from(line)?)))
            }
            Some(Command::QueryIdent) => Ok(Some(Response::Id(Ident::try_from(line)?))),
            Some(Command::QueryRunMode) => {
                let mode = response::text(line)?
                    .parse()
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("{}", e)))?;
                Ok(Some(Response::Mode(mode)))
            }
            Some(Command::QuerySampleRate) => {
                Ok(Some(Response::SampleRate(response::parse_f64(line)?)))
            }
            Some(Command::QueryOutput(_)) => {
                let state = response::text(line)?
                    .parse()
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("{}", e)))?;
                Ok(Some(Response::Output(state)))
            }
            Some(Command::QueryOutputLoad(_)) => {
                let load = response::text(line)?
                    .parse()
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("{}", e)))?;
                Ok(Some(Response::Load(load)))
            }
            Some(Command::QueryVoltageHigh(_))
            | Some(Command::QueryVoltageLow(_))
            | Some(Command::QueryAmplitude(_))
            | Some(Command::QueryOffset(_)) => {
                Ok(Some(Response::Voltage(response::parse_f64(line)?)))
            }
            Some(Command::QueryLength) | Some(Command::QueryLoopCount) => {
                Ok(Some(Response::Count(response::parse_u64(line)?)))
            }
            Some(Command::QueryWaveform(_)) => {
                Ok(Some(Response::Waveform(response::parse_name(line)?)))
            }
            Some(_) => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Response to a command that expects none",
            )),
            None => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Response before any command was sent",
            )),
        }
    }
}

fn write_fmt_guarded(dst: &mut BytesMut, args: fmt::Arguments<'_>) -> Result<(), io::Error> {
    dst.write_fmt(args)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

impl Encoder<Command> for ScpiCodec {
    type Error = io::Error;

    fn encode(&mut self, item: Command, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match &item {
            Command::Run => write_fmt_guarded(dst, format_args!("AWGControl:RUN"))?,
            Command::Stop => write_fmt_guarded(dst, format_args!("AWGControl:STOP"))?,
            Command::Trigger => write_fmt_guarded(dst, format_args!("*TRG"))?,
            Command::QueryRunState => {
                write_fmt_guarded(dst, format_args!("AWGControl:RSTATe?"))?
            }
            Command::QueryIdent => write_fmt_guarded(dst, format_args!("*IDN?"))?,
            Command::QueryOperationComplete => write_fmt_guarded(dst, format_args!("*OPC?"))?,
            Command::QueryRunMode => write_fmt_guarded(dst, format_args!("AWGControl:RMODe?"))?,
            Command::SetRunMode(mode) => {
                write_fmt_guarded(dst, format_args!("AWGControl:RMODe {}", mode))?
            }
            Command::QuerySampleRate => {
                write_fmt_guarded(dst, format_args!("AWGControl:SRATe?"))?
            }
            Command::SetSampleRate(rate) => {
                write_fmt_guarded(dst, format_args!("AWGControl:SRATe {}", rate))?
            }
            Command::SetDisplayUnit(unit) => {
                write_fmt_guarded(dst, format_args!("DISPlay:UNIT:VOLT {}", unit))?
            }
            Command::QueryOutput(ch) => {
                write_fmt_guarded(dst, format_args!("OUTPut{}:STATe?", ch))?
            }
            Command::SetOutput(ch, state) => {
                write_fmt_guarded(dst, format_args!("OUTPut{}:STATe {}", ch, state))?
            }
            Command::QueryOutputLoad(ch) => {
                write_fmt_guarded(dst, format_args!("OUTPut{}:SERIESIMPedance?", ch))?
            }
            Command::SetOutputLoad(ch, load) => {
                write_fmt_guarded(dst, format_args!("OUTPut{}:SERIESIMPedance {}", ch, load))?
            }
            Command::QueryVoltageHigh(ch) => {
                write_fmt_guarded(dst, format_args!("SEQuence:ELEM1:VOLTage:HIGH{}?", ch))?
            }
            Command::SetVoltageHigh(ch, volts) => write_fmt_guarded(
                dst,
                format_args!("SEQuence:ELEM1:VOLTage:HIGH{} {}", ch, volts),
            )?,
            Command::QueryVoltageLow(ch) => {
                write_fmt_guarded(dst, format_args!("SEQuence:ELEM1:VOLTage:LOW{}?", ch))?
            }
            Command::SetVoltageLow(ch, volts) => write_fmt_guarded(
                dst,
                format_args!("SEQuence:ELEM1:VOLTage:LOW{} {}", ch, volts),
            )?,
            Command::QueryAmplitude(ch) => {
                write_fmt_guarded(dst, format_args!("SEQuence:ELEM1:AMPlitude{}?", ch))?
            }
            Command::SetAmplitude(ch, level) => write_fmt_guarded(
                dst,
                format_args!("SEQuence:ELEM1:AMPlitude{} {}", ch, level),
            )?,
            Command::QueryOffset(ch) => {
                write_fmt_guarded(dst, format_args!("SEQuence:ELEM1:OFFset{}?", ch))?
            }
            Command::SetOffset(ch, level) => {
                write_fmt_guarded(dst, format_args!("SEQuence:ELEM1:OFFset{} {}", ch, level))?
            }
            // Length and loop count address the sequence element as a whole;
            // no channel index on the wire.
            Command::QueryLength => {
                write_fmt_guarded(dst, format_args!("SEQuence:ELEM1:LENGth?"))?
            }
            Command::SetLength(length) => {
                write_fmt_guarded(dst, format_args!("SEQuence:ELEM1:LENGth {}", length))?
            }
            Command::QueryLoopCount => {
                write_fmt_guarded(dst, format_args!("SEQuence:ELEM1:LOOP:COUNt?"))?
            }
            Command::SetLoopCount(count) => {
                write_fmt_guarded(dst, format_args!("SEQuence:ELEM1:LOOP:COUNt {}", count))?
            }
            Command::QueryWaveform(ch) => {
                write_fmt_guarded(dst, format_args!("SEQuence:ELEM1:WAVeform{}?", ch))?
            }
            Command::SetWaveform(ch, name) => write_fmt_guarded(
                dst,
                format_args!("SEQuence:ELEM1:WAVeform{} \"{}\"", ch, name),
            )?,
            Command::DownloadName(path) => {
                write_fmt_guarded(dst, format_args!("MMEMory:DOWNload:FNAMe \"{}\"", path))?
            }
            Command::DownloadData(payload) => write_fmt_guarded(
                dst,
                format_args!(
                    "MMEMory:DOWNload:DATA {}{}",
                    waveform::block_prefix(payload.len()),
                    payload
                ),
            )?,
            Command::DeleteWaveform(name) => {
                write_fmt_guarded(dst, format_args!("WLISt:WAVeform:DELete \"{}\"", name))?
            }
            Command::ImportWaveform { name, path } => write_fmt_guarded(
                dst,
                format_args!("WLISt:WAVeform:IMPort \"{}\",\"{}\",ANAlog", name, path),
            )?,
        }
        dst.write_char(TERMINATOR as char)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        self.last_cmd = Some(item);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::command::{Channel, OutputState, RunMode};

    fn encoded(cmd: Command) -> String {
        let mut codec = ScpiCodec::default();
        let mut buf = BytesMut::new();
        codec.encode(cmd, &mut buf).unwrap();
        String::from_utf8(buf.to_vec()).unwrap()
    }

    #[test]
    fn encodes_channel_scoped_commands() {
        assert_eq!(
            encoded(Command::SetOutput(Channel::One, OutputState::On)),
            "OUTPut1:STATe ON\n"
        );
        assert_eq!(
            encoded(Command::SetVoltageLow(Channel::Two, -0.5)),
            "SEQuence:ELEM1:VOLTage:LOW2 -0.5\n"
        );
        assert_eq!(
            encoded(Command::SetWaveform(Channel::Two, "temp2".into())),
            "SEQuence:ELEM1:WAVeform2 \"temp2\"\n"
        );
    }

    #[test]
    fn encodes_download_block() {
        assert_eq!(
            encoded(Command::DownloadData("0\r\n1\r\n0\r\n1".into())),
            "MMEMory:DOWNload:DATA #2100\r\n1\r\n0\r\n1\n"
        );
    }

    #[test]
    fn decodes_query_by_last_command() {
        let mut codec = ScpiCodec::default();
        let mut out = BytesMut::new();
        codec.encode(Command::QueryRunState, &mut out).unwrap();

        let mut src = BytesMut::from(&b"2\r\n"[..]);
        let response = codec.decode(&mut src).unwrap();
        assert_eq!(response, Some(Response::State(RunState::Running)));
    }

    #[test]
    fn decodes_run_mode_long_form() {
        let mut codec = ScpiCodec::default();
        let mut out = BytesMut::new();
        codec.encode(Command::QueryRunMode, &mut out).unwrap();

        let mut src = BytesMut::from(&b"BURST\n"[..]);
        let response = codec.decode(&mut src).unwrap();
        assert_eq!(response, Some(Response::Mode(RunMode::Burst)));
    }

    #[test]
    fn incomplete_line_yields_nothing() {
        let mut codec = ScpiCodec::default();
        let mut out = BytesMut::new();
        codec.encode(Command::QueryOperationComplete, &mut out).unwrap();

        let mut src = BytesMut::from(&b"1"[..]);
        assert_eq!(codec.decode(&mut src).unwrap(), None);
        src.extend_from_slice(b"\n");
        assert_eq!(
            codec.decode(&mut src).unwrap(),
            Some(Response::OperationComplete("1".into()))
        );
    }

    #[test]
    fn unsolicited_line_is_an_error() {
        let mut codec = ScpiCodec::default();
        let mut src = BytesMut::from(&b"1\n"[..]);
        assert!(codec.decode(&mut src).is_err());
    }
}
