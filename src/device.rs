use futures::{SinkExt, StreamExt};
use std::pin::Pin;
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio_serial::SerialPortBuilderExt;
use tokio_util::codec::Decoder;
use tracing::{debug, trace};

use super::proto::{
    codec::ScpiCodec,
    command::{
        Channel, Command, DisplayUnit, ElementLength, Level, LoopCount, OutputLoad, OutputState,
        RunMode,
    },
    response::{Ident, Response, RunState},
    ProtoError,
};
use crate::proto::Result;
use crate::waveform;
use crate::DEFAULT_WAVEFORM_FOLDER;

/// Channel voltage limits in volts.
const MIN_LEVEL: f64 = -3.0;
const MAX_LEVEL: f64 = 3.0;

/// Marker sample the sequencer expects at the end of every imported trace.
const TRAILER_SAMPLE: f64 = 100.0;

trait AsyncReadWrite<S>: futures::Sink<S> + futures::Stream {}

impl<T, S> AsyncReadWrite<S> for T where T: futures::Sink<S> + futures::Stream {}

/// Driver handle for the arbitrary waveform generator.
///
/// Every method is one blocking round trip on the underlying connection;
/// `&mut self` keeps access serialized, which the instrument requires.
#[allow(clippy::type_complexity)]
pub struct Device {
    stream: Pin<
        Box<
            dyn AsyncReadWrite<
                Command,
                Error = std::io::Error,
                Item = std::result::Result<Response, std::io::Error>,
            >,
        >,
    >,
}

impl Device {
    /// Connect over the raw SCPI socket (port 5025 on the instrument).
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let socket = TcpStream::connect(addr).await?;
        socket.set_nodelay(true)?;

        let stream = ScpiCodec::default().framed(socket);

        Ok(Self {
            stream: Box::pin(stream),
        })
    }

    /// Connect over a USB-CDC serial port.
    pub fn open_serial(com: impl AsRef<str>, baudrate: u32) -> Result<Self> {
        let mut port = tokio_serial::new(com.as_ref(), baudrate).open_native_async()?;

        #[cfg(unix)]
        port.set_exclusive(false)
            .expect("Unable to set serial port exclusive to false");

        let stream = ScpiCodec::default().framed(port);

        Ok(Self {
            stream: Box::pin(stream),
        })
    }

    #[cfg(test)]
    pub fn new_faked(
        response: &str,
    ) -> (Self, std::sync::Arc<std::sync::Mutex<Vec<u8>>>) {
        let fake = super::proto::fake::FakeBuffer::new(response.as_bytes().to_vec());
        let written = fake.written();
        let stream = ScpiCodec::default().framed(fake);

        (
            Self {
                stream: Box::pin(stream),
            },
            written,
        )
    }

    /// Wait until all queued instrument operations have finished and
    /// return the trimmed acknowledgment.
    async fn operation_complete(&mut self) -> Result<String> {
        self.stream.send(Command::QueryOperationComplete).await?;
        match self.stream.next().await {
            Some(Ok(Response::OperationComplete(ack))) => {
                trace!(%ack, "operation complete");
                Ok(ack)
            }
            Some(Ok(response)) => Err(response.into()),
            Some(Err(ioerr)) => Err(ioerr.into()),
            None => Err(ProtoError::Abort),
        }
    }

    /// Start waveform generation.
    pub async fn run(&mut self) -> Result<String> {
        self.stream.send(Command::Run).await?;
        self.operation_complete().await
    }

    /// Stop waveform generation.
    pub async fn stop(&mut self) -> Result<String> {
        self.stream.send(Command::Stop).await?;
        self.operation_complete().await
    }

    /// Issue a software trigger event.
    pub async fn trigger(&mut self) -> Result<String> {
        self.stream.send(Command::Trigger).await?;
        self.operation_complete().await
    }

    /// Query the run state (stopped, waiting for trigger, running).
    pub async fn state(&mut self) -> Result<RunState> {
        self.stream.send(Command::QueryRunState).await?;
        match self.stream.next().await {
            Some(Ok(Response::State(state))) => Ok(state),
            Some(Ok(response)) => Err(response.into()),
            Some(Err(ioerr)) => Err(ioerr.into()),
            None => Err(ProtoError::Abort),
        }
    }

    /// Query device identification.
    pub async fn ident(&mut self) -> Result<Ident> {
        self.stream.send(Command::QueryIdent).await?;
        match self.stream.next().await {
            Some(Ok(Response::Id(id))) => Ok(id),
            Some(Ok(response)) => Err(response.into()),
            Some(Err(ioerr)) => Err(ioerr.into()),
            None => Err(ProtoError::Abort),
        }
    }

    /// Query the sequencer run mode.
    pub async fn run_mode(&mut self) -> Result<RunMode> {
        self.stream.send(Command::QueryRunMode).await?;
        match self.stream.next().await {
            Some(Ok(Response::Mode(mode))) => Ok(mode),
            Some(Ok(response)) => Err(response.into()),
            Some(Err(ioerr)) => Err(ioerr.into()),
            None => Err(ProtoError::Abort),
        }
    }

    /// Set the sequencer run mode.
    pub async fn set_run_mode(&mut self, mode: RunMode) -> Result<()> {
        self.stream.send(Command::SetRunMode(mode)).await?;
        Ok(())
    }

    /// Query the sampling clock rate in Hz.
    pub async fn sample_rate(&mut self) -> Result<f64> {
        self.stream.send(Command::QuerySampleRate).await?;
        match self.stream.next().await {
            Some(Ok(Response::SampleRate(rate))) => Ok(rate),
            Some(Ok(response)) => Err(response.into()),
            Some(Err(ioerr)) => Err(ioerr.into()),
            None => Err(ProtoError::Abort),
        }
    }

    /// Set the sampling clock rate in Hz. The rate is shared by both
    /// channels; the instrument clips values it cannot generate.
    pub async fn set_sample_rate(&mut self, rate: f64) -> Result<()> {
        self.stream.send(Command::SetSampleRate(rate)).await?;
        Ok(())
    }

    /// Select how voltage ranges are specified on the display: as
    /// amplitude/offset or as high/low levels. Set-only on the instrument.
    pub async fn set_display_unit(&mut self, unit: DisplayUnit) -> Result<()> {
        self.stream.send(Command::SetDisplayUnit(unit)).await?;
        Ok(())
    }

    /// Query a channel output state.
    pub async fn output(&mut self, channel: Channel) -> Result<OutputState> {
        self.stream.send(Command::QueryOutput(channel)).await?;
        match self.stream.next().await {
            Some(Ok(Response::Output(state))) => Ok(state),
            Some(Ok(response)) => Err(response.into()),
            Some(Err(ioerr)) => Err(ioerr.into()),
            None => Err(ProtoError::Abort),
        }
    }

    /// Turn a channel output on or off.
    pub async fn set_output(
        &mut self,
        channel: Channel,
        state: impl Into<OutputState>,
    ) -> Result<()> {
        self.stream
            .send(Command::SetOutput(channel, state.into()))
            .await?;
        Ok(())
    }

    /// Query the expected load setting of a channel.
    pub async fn output_load(&mut self, channel: Channel) -> Result<OutputLoad> {
        self.stream.send(Command::QueryOutputLoad(channel)).await?;
        match self.stream.next().await {
            Some(Ok(Response::Load(load))) => Ok(load),
            Some(Ok(response)) => Err(response.into()),
            Some(Err(ioerr)) => Err(ioerr.into()),
            None => Err(ProtoError::Abort),
        }
    }

    /// Set the expected load of a channel, used by the instrument to
    /// correct the displayed voltage.
    pub async fn set_output_load(&mut self, channel: Channel, load: OutputLoad) -> Result<()> {
        self.stream
            .send(Command::SetOutputLoad(channel, load))
            .await?;
        Ok(())
    }

    /// Query the upper voltage of the output waveform in V.
    pub async fn voltage_high(&mut self, channel: Channel) -> Result<f64> {
        self.stream.send(Command::QueryVoltageHigh(channel)).await?;
        self.voltage_response().await
    }

    /// Set the upper voltage of the output waveform in V, within
    /// [-3 V, 3 V]. Keeping it at least 1 mV above the low voltage is the
    /// caller's responsibility.
    pub async fn set_voltage_high(&mut self, channel: Channel, volts: f64) -> Result<()> {
        check_level("voltage high", volts)?;
        self.stream
            .send(Command::SetVoltageHigh(channel, volts))
            .await?;
        Ok(())
    }

    /// Query the lower voltage of the output waveform in V.
    pub async fn voltage_low(&mut self, channel: Channel) -> Result<f64> {
        self.stream.send(Command::QueryVoltageLow(channel)).await?;
        self.voltage_response().await
    }

    /// Set the lower voltage of the output waveform in V, within
    /// [-3 V, 3 V].
    pub async fn set_voltage_low(&mut self, channel: Channel, volts: f64) -> Result<()> {
        check_level("voltage low", volts)?;
        self.stream
            .send(Command::SetVoltageLow(channel, volts))
            .await?;
        Ok(())
    }

    /// Query the peak-to-peak amplitude of the sequence element in V.
    pub async fn amplitude(&mut self, channel: Channel) -> Result<f64> {
        self.stream.send(Command::QueryAmplitude(channel)).await?;
        self.voltage_response().await
    }

    /// Set the peak-to-peak amplitude of the sequence element: volts or
    /// MIN/MAX/DEF (the default is 2 V). Range enforcement is left to the
    /// instrument.
    pub async fn set_amplitude(
        &mut self,
        channel: Channel,
        level: impl Into<Level>,
    ) -> Result<()> {
        self.stream
            .send(Command::SetAmplitude(channel, level.into()))
            .await?;
        Ok(())
    }

    /// Query the voltage offset of the sequence element in V.
    pub async fn offset(&mut self, channel: Channel) -> Result<f64> {
        self.stream.send(Command::QueryOffset(channel)).await?;
        self.voltage_response().await
    }

    /// Set the voltage offset of the sequence element: volts or
    /// MIN/MAX/DEF (the default is 0 V).
    pub async fn set_offset(&mut self, channel: Channel, level: impl Into<Level>) -> Result<()> {
        self.stream
            .send(Command::SetOffset(channel, level.into()))
            .await?;
        Ok(())
    }

    /// Query the number of waveform samples played by the sequence element.
    pub async fn length(&mut self) -> Result<u64> {
        self.stream.send(Command::QueryLength).await?;
        self.count_response().await
    }

    /// Set the number of waveform samples played by the sequence element:
    /// a count or MIN/MAX/DEF (the default is 2048). Must not exceed the
    /// sample count of the selected waveform.
    pub async fn set_length(&mut self, length: impl Into<ElementLength>) -> Result<()> {
        self.stream.send(Command::SetLength(length.into())).await?;
        Ok(())
    }

    /// Query the repetition count of the sequence element.
    pub async fn loop_count(&mut self) -> Result<u64> {
        self.stream.send(Command::QueryLoopCount).await?;
        self.count_response().await
    }

    /// Set the repetition count of the sequence element: a count,
    /// MIN/MAX/DEF or INF.
    pub async fn set_loop_count(&mut self, count: impl Into<LoopCount>) -> Result<()> {
        self.stream
            .send(Command::SetLoopCount(count.into()))
            .await?;
        Ok(())
    }

    /// Query the waveform selected for a channel.
    pub async fn waveform(&mut self, channel: Channel) -> Result<String> {
        self.stream.send(Command::QueryWaveform(channel)).await?;
        match self.stream.next().await {
            Some(Ok(Response::Waveform(name))) => Ok(name),
            Some(Ok(response)) => Err(response.into()),
            Some(Err(ioerr)) => Err(ioerr.into()),
            None => Err(ProtoError::Abort),
        }
    }

    /// Select a waveform from the waveform list for a channel. The list
    /// ships with ten predefined waveforms (Sine, Ramp, Square, Sync, DC,
    /// Gaussian, Lorentz, Haversine, Exp_Rise, Exp_Decay); custom entries
    /// must be imported first, see [`Device::upload_waveform`].
    pub async fn set_waveform(
        &mut self,
        channel: Channel,
        name: impl Into<String>,
    ) -> Result<()> {
        self.stream
            .send(Command::SetWaveform(channel, name.into()))
            .await?;
        Ok(())
    }

    /// Upload an arbitrary trace and import it into the waveform list
    /// under `name`, replacing any existing entry of that name.
    ///
    /// The samples travel as a text file into the instrument mass storage
    /// (`folder` defaults to the instrument-local import folder), then the
    /// file is imported as an analog waveform. With no samples given, a
    /// short square pattern is uploaded instead.
    ///
    /// No step is retried: a transport failure mid-sequence leaves the
    /// instrument in whatever state the completed prefix produced.
    pub async fn upload_waveform(
        &mut self,
        name: &str,
        samples: Option<&[f64]>,
        folder: Option<&str>,
    ) -> Result<String> {
        let samples = match samples {
            Some(samples) => samples.to_vec(),
            None => waveform::default_square(),
        };
        let records = waveform::records(&samples);

        let folder = folder.unwrap_or(DEFAULT_WAVEFORM_FOLDER);
        let path = format!("{}{}.txt", folder, name);

        debug!(name, samples = samples.len(), %path, "uploading waveform");

        // Downloading while the sequencer runs is undefined on the hardware.
        self.stop().await?;
        self.stream.send(Command::DownloadName(path.clone())).await?;
        self.stream.send(Command::DownloadData(records)).await?;
        self.operation_complete().await?;

        // Idempotent on the instrument: deleting a missing entry is not an
        // error, so the result is not inspected.
        self.stream
            .send(Command::DeleteWaveform(name.to_string()))
            .await?;
        self.stream
            .send(Command::ImportWaveform {
                name: name.to_string(),
                path,
            })
            .await?;
        self.operation_complete().await
    }

    async fn voltage_response(&mut self) -> Result<f64> {
        match self.stream.next().await {
            Some(Ok(Response::Voltage(volts))) => Ok(volts),
            Some(Ok(response)) => Err(response.into()),
            Some(Err(ioerr)) => Err(ioerr.into()),
            None => Err(ProtoError::Abort),
        }
    }

    async fn count_response(&mut self) -> Result<u64> {
        match self.stream.next().await {
            Some(Ok(Response::Count(count))) => Ok(count),
            Some(Ok(response)) => Err(response.into()),
            Some(Err(ioerr)) => Err(ioerr.into()),
            None => Err(ProtoError::Abort),
        }
    }
}

fn check_level(property: &'static str, volts: f64) -> Result<()> {
    if !(MIN_LEVEL..=MAX_LEVEL).contains(&volts) {
        return Err(ProtoError::OutOfRange {
            property,
            value: volts,
            min: MIN_LEVEL,
            max: MAX_LEVEL,
        });
    }
    Ok(())
}

/// Upload `samples` under `name` and configure `channel` to play it at the
/// given peak voltage, leaving the channel output enabled.
///
/// The channel output stays off while voltages, waveform selection and
/// length are reconfigured; reconfiguring a live output is undefined on
/// the hardware. A trailer sample is appended for the sequencer and
/// excluded again from the programmed element length.
pub async fn configure_and_upload_channel(
    awg: &mut Device,
    name: &str,
    samples: &[f64],
    amplitude: f64,
    sample_rate: Option<f64>,
    channel: Channel,
    run: bool,
) -> Result<()> {
    let mut samples = samples.to_vec();
    samples.push(TRAILER_SAMPLE);

    debug!(name, channel = %channel, samples = samples.len(), "configuring channel");

    awg.stop().await?;
    // High/low levels are set below, so switch the range display away
    // from amplitude/offset mode first.
    awg.set_display_unit(DisplayUnit::HighLow).await?;
    awg.upload_waveform(name, Some(&samples), None).await?;

    if let Some(rate) = sample_rate {
        awg.set_sample_rate(rate).await?;
    }

    awg.set_output(channel, OutputState::Off).await?;
    awg.set_output_load(channel, OutputLoad::FiftyOhm).await?;
    awg.set_voltage_high(channel, amplitude).await?;
    awg.set_voltage_low(channel, 0.0).await?;
    awg.set_waveform(channel, name).await?;
    awg.set_length(samples.len() as u64 - 1).await?;
    awg.set_output(channel, OutputState::On).await?;

    if run {
        awg.run().await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {

    use super::*;
    use std::sync::{Arc, Mutex};

    fn written_str(log: &Arc<Mutex<Vec<u8>>>) -> String {
        String::from_utf8(log.lock().unwrap().clone()).unwrap()
    }

    #[tokio::test]
    async fn test_get_ident() {
        let (mut device, written) =
            Device::new_faked("Teledyne,T3AWG3252,T0001234,1.5.2\r\n");
        let id = device.ident().await.unwrap();
        assert_eq!(id.model, "T3AWG3252");
        assert_eq!(written_str(&written), "*IDN?\n");
    }

    #[tokio::test]
    async fn test_run_returns_trimmed_ack() {
        let (mut device, written) = Device::new_faked("1\r\n");
        assert_eq!(device.run().await.unwrap(), "1");
        assert_eq!(written_str(&written), "AWGControl:RUN\n*OPC?\n");
    }

    #[tokio::test]
    async fn test_stop_returns_trimmed_ack() {
        let (mut device, written) = Device::new_faked("1\r\n");
        assert_eq!(device.stop().await.unwrap(), "1");
        assert_eq!(written_str(&written), "AWGControl:STOP\n*OPC?\n");
    }

    #[tokio::test]
    async fn test_trigger() {
        let (mut device, written) = Device::new_faked("1\r\n");
        assert!(device.trigger().await.is_ok());
        assert_eq!(written_str(&written), "*TRG\n*OPC?\n");
    }

    #[tokio::test]
    async fn test_state_is_query_only() {
        let (mut device, written) = Device::new_faked("2\r\n");
        assert_eq!(device.state().await.unwrap(), RunState::Running);
        assert_eq!(written_str(&written), "AWGControl:RSTATe?\n");
    }

    #[tokio::test]
    async fn test_state_rejects_unknown_code() {
        let (mut device, _) = Device::new_faked("7\r\n");
        assert!(device.state().await.is_err());
    }

    #[tokio::test]
    async fn test_closed_connection_aborts() {
        let (mut device, _) = Device::new_faked("");
        assert!(matches!(device.run().await, Err(ProtoError::Abort)));
    }

    #[tokio::test]
    async fn test_voltage_setters_validate_range() {
        let (mut device, written) = Device::new_faked("");

        assert!(matches!(
            device.set_voltage_high(Channel::One, 3.2).await,
            Err(ProtoError::OutOfRange { .. })
        ));
        assert!(matches!(
            device.set_voltage_low(Channel::Two, -3.001).await,
            Err(ProtoError::OutOfRange { .. })
        ));
        // Nothing reaches the wire for a rejected value.
        assert_eq!(written_str(&written), "");

        device.set_voltage_high(Channel::One, 3.0).await.unwrap();
        device.set_voltage_low(Channel::One, -3.0).await.unwrap();
        assert_eq!(
            written_str(&written),
            "SEQuence:ELEM1:VOLTage:HIGH1 3\nSEQuence:ELEM1:VOLTage:LOW1 -3\n"
        );
    }

    #[tokio::test]
    async fn test_output_bool_maps_to_wire_tokens() {
        let (mut device, written) = Device::new_faked("");
        device.set_output(Channel::One, true).await.unwrap();
        device.set_output(Channel::Two, false).await.unwrap();
        device.set_output(Channel::One, OutputState::Off).await.unwrap();
        assert_eq!(
            written_str(&written),
            "OUTPut1:STATe ON\nOUTPut2:STATe OFF\nOUTPut1:STATe OFF\n"
        );
    }

    #[tokio::test]
    async fn test_query_output() {
        let (mut device, _) = Device::new_faked("ON\r\n");
        assert_eq!(device.output(Channel::One).await.unwrap(), OutputState::On);
    }

    #[tokio::test]
    async fn test_set_run_mode() {
        let (mut device, written) = Device::new_faked("");
        device.set_run_mode(RunMode::Burst).await.unwrap();
        assert_eq!(written_str(&written), "AWGControl:RMODe BURS\n");
    }

    #[tokio::test]
    async fn test_sample_rate_roundtrip_commands() {
        let (mut device, written) = Device::new_faked("1250000000\r\n");
        assert_eq!(device.sample_rate().await.unwrap(), 1.25e9);
        device.set_sample_rate(5e8).await.unwrap();
        assert_eq!(
            written_str(&written),
            "AWGControl:SRATe?\nAWGControl:SRATe 500000000\n"
        );
    }

    #[tokio::test]
    async fn test_sequence_element_accessors() {
        let (mut device, written) = Device::new_faked("2048\r\n1\r\n");
        assert_eq!(device.length().await.unwrap(), 2048);
        assert_eq!(device.loop_count().await.unwrap(), 1);
        device.set_length(ElementLength::Default).await.unwrap();
        device.set_loop_count(LoopCount::Infinite).await.unwrap();
        assert_eq!(
            written_str(&written),
            "SEQuence:ELEM1:LENGth?\nSEQuence:ELEM1:LOOP:COUNt?\n\
             SEQuence:ELEM1:LENGth DEF\nSEQuence:ELEM1:LOOP:COUNt INF\n"
        );
    }

    #[tokio::test]
    async fn test_query_waveform_strips_quotes() {
        let (mut device, _) = Device::new_faked("\"temp1\"\r\n");
        assert_eq!(device.waveform(Channel::One).await.unwrap(), "temp1");
    }

    #[tokio::test]
    async fn test_upload_waveform_sequence() {
        let (mut device, written) = Device::new_faked("1\r\n1\r\n1\r\n");
        let ack = device
            .upload_waveform("temp1", Some(&[0.0, 1.0, 0.0, 1.0]), None)
            .await
            .unwrap();
        assert_eq!(ack, "1");

        let path = "C:/Users/awg3000/Pictures/Saved Pictures/temp1.txt";
        let expected = format!(
            "AWGControl:STOP\n*OPC?\n\
             MMEMory:DOWNload:FNAMe \"{path}\"\n\
             MMEMory:DOWNload:DATA #2100\r\n1\r\n0\r\n1\n\
             *OPC?\n\
             WLISt:WAVeform:DELete \"temp1\"\n\
             WLISt:WAVeform:IMPort \"temp1\",\"{path}\",ANAlog\n\
             *OPC?\n"
        );
        assert_eq!(written_str(&written), expected);
    }

    #[tokio::test]
    async fn test_upload_waveform_default_square() {
        let (mut device, written) = Device::new_faked("1\r\n1\r\n1\r\n");
        device.upload_waveform("sq", None, None).await.unwrap();
        // 20 single-digit samples joined by CR/LF: 20 + 19 * 2 characters.
        assert!(written_str(&written).contains("MMEMory:DOWNload:DATA #258"));
    }

    #[tokio::test]
    async fn test_upload_waveform_custom_folder() {
        let (mut device, written) = Device::new_faked("1\r\n1\r\n1\r\n");
        device
            .upload_waveform("w", Some(&[0.5]), Some("D:/waves/"))
            .await
            .unwrap();
        let log = written_str(&written);
        assert!(log.contains("MMEMory:DOWNload:FNAMe \"D:/waves/w.txt\""));
        assert!(log.contains("WLISt:WAVeform:IMPort \"w\",\"D:/waves/w.txt\",ANAlog"));
    }

    #[tokio::test]
    async fn test_configure_and_upload_channel() {
        let (mut device, written) = Device::new_faked("1\r\n1\r\n1\r\n1\r\n");
        configure_and_upload_channel(
            &mut device,
            "temp1",
            &[0.0, 1.0, 0.0, 1.0],
            2.0,
            None,
            Channel::One,
            false,
        )
        .await
        .unwrap();

        let path = "C:/Users/awg3000/Pictures/Saved Pictures/temp1.txt";
        let expected = format!(
            "AWGControl:STOP\n*OPC?\n\
             DISPlay:UNIT:VOLT HIGH\n\
             AWGControl:STOP\n*OPC?\n\
             MMEMory:DOWNload:FNAMe \"{path}\"\n\
             MMEMory:DOWNload:DATA #2150\r\n1\r\n0\r\n1\r\n100\n\
             *OPC?\n\
             WLISt:WAVeform:DELete \"temp1\"\n\
             WLISt:WAVeform:IMPort \"temp1\",\"{path}\",ANAlog\n\
             *OPC?\n\
             OUTPut1:STATe OFF\n\
             OUTPut1:SERIESIMPedance 50Ohm\n\
             SEQuence:ELEM1:VOLTage:HIGH1 2\n\
             SEQuence:ELEM1:VOLTage:LOW1 0\n\
             SEQuence:ELEM1:WAVeform1 \"temp1\"\n\
             SEQuence:ELEM1:LENGth 4\n\
             OUTPut1:STATe ON\n"
        );
        let log = written_str(&written);
        assert_eq!(log, expected);
        assert!(!log.contains("AWGControl:RUN"));

        // Output goes off before any element reconfiguration and on after
        // the length is programmed.
        let off = log.find("OUTPut1:STATe OFF").unwrap();
        let high = log.find("SEQuence:ELEM1:VOLTage:HIGH1").unwrap();
        let length = log.find("SEQuence:ELEM1:LENGth 4").unwrap();
        let on = log.find("OUTPut1:STATe ON").unwrap();
        assert!(off < high && high < length && length < on);
    }

    #[tokio::test]
    async fn test_configure_channel_two_with_rate_and_run() {
        let (mut device, written) = Device::new_faked("1\r\n1\r\n1\r\n1\r\n1\r\n");
        configure_and_upload_channel(
            &mut device,
            "temp2",
            &[0.25, -0.25],
            1.0,
            Some(2.5e9),
            Channel::Two,
            true,
        )
        .await
        .unwrap();

        let log = written_str(&written);
        assert!(log.contains("AWGControl:SRATe 2500000000\n"));
        assert!(log.contains("OUTPut2:STATe OFF\n"));
        assert!(log.contains("SEQuence:ELEM1:VOLTage:LOW2 0\n"));
        // 3 samples after the trailer, element length excludes it.
        assert!(log.contains("SEQuence:ELEM1:LENGth 2\n"));
        assert!(log.ends_with("OUTPut2:STATe ON\nAWGControl:RUN\n*OPC?\n"));
    }
}
