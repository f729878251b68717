//! AT session against the LoRa module: connectivity, then firmware version,
//! then DevEui. Stages run strictly in order and the first failure ends the
//! sequence.

use core::fmt;

use embedded_hal::serial::{Read, Write};

use crate::{
    clock::Clock,
    constants::{
        SessionConfig, CMD_AT, CMD_DEV_EUI, CMD_VERSION, TOKEN_DEV_EUI, TOKEN_OK, TOKEN_VERSION,
    },
    deveui::{format_dev_eui, DevEui, DevEuiError},
    transport::{Line, LineTransport, TransportError},
};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AtCommand {
    Ping,
    Version,
    DevEui,
}

impl AtCommand {
    pub fn as_str(self) -> &'static str {
        match self {
            AtCommand::Ping => CMD_AT,
            AtCommand::Version => CMD_VERSION,
            AtCommand::DevEui => CMD_DEV_EUI,
        }
    }

    /// Substring a reply must contain to count as an answer to this command.
    pub fn expected_token(self) -> &'static str {
        match self {
            AtCommand::Ping => TOKEN_OK,
            AtCommand::Version => TOKEN_VERSION,
            AtCommand::DevEui => TOKEN_DEV_EUI,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionError {
    Timeout,
    SerialError,
    UnexpectedResponse,
    MalformedDevEui,
}

impl From<TransportError> for SessionError {
    fn from(value: TransportError) -> Self {
        match value {
            TransportError::Timeout => SessionError::Timeout,
            TransportError::SerialError => SessionError::SerialError,
        }
    }
}

impl From<DevEuiError> for SessionError {
    fn from(_: DevEuiError) -> Self {
        SessionError::MalformedDevEui
    }
}

/// Everything the session prints for the user, in order of appearance.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Report<'a> {
    Connected,
    Version(&'a Line),
    Identity(&'a Line),
    DevEui(&'a DevEui),
    NotResponding,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Connected => f.write_str("Connected to LoRa module"),
            Report::Version(line) | Report::Identity(line) => write!(f, "{}", line),
            Report::DevEui(eui) => write!(f, "{}", eui),
            Report::NotResponding => f.write_str("Module not responding"),
        }
    }
}

pub trait ReportSink {
    fn report(&mut self, report: Report<'_>);
}

pub struct AtClient<S, C> {
    transport: LineTransport<S, C>,
    config: SessionConfig,
}

impl<S, C> AtClient<S, C>
where
    S: Read<u8> + Write<u8>,
    C: Clock,
{
    pub fn new(transport: LineTransport<S, C>, config: SessionConfig) -> AtClient<S, C> {
        AtClient { transport, config }
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    pub fn transport(&self) -> &LineTransport<S, C> {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut LineTransport<S, C> {
        &mut self.transport
    }

    pub fn free(self) -> LineTransport<S, C> {
        self.transport
    }

    /// One send/read round trip. The reply must contain the command's token.
    pub fn exchange(&mut self, cmd: AtCommand) -> Result<Line, SessionError> {
        self.transport.send(cmd.as_str())?;
        let line = self.transport.read_line(self.config.response_timeout_ms)?;

        if line.contains(cmd.expected_token()) {
            Ok(line)
        } else {
            debug!("at: {} got unexpected reply: {}", cmd, line);
            Err(SessionError::UnexpectedResponse)
        }
    }

    /// Pings with `AT` until a reply contains `OK`, at most
    /// `connect_attempts` times. Returns the attempt (1-based) that succeeded.
    pub fn check_connection(&mut self) -> Result<u8, SessionError> {
        let mut last_err = SessionError::Timeout;

        for attempt in 1..=self.config.connect_attempts {
            match self.exchange(AtCommand::Ping) {
                Ok(_) => {
                    info!("at: module answered on attempt {}", attempt);
                    return Ok(attempt);
                }
                Err(e) => {
                    warn!("at: ping attempt {} failed: {:?}", attempt, e);
                    last_err = e;
                }
            }
        }

        Err(last_err)
    }

    pub fn query_version(&mut self) -> Result<Line, SessionError> {
        self.exchange(AtCommand::Version)
    }

    pub fn query_dev_eui(&mut self) -> Result<Line, SessionError> {
        self.exchange(AtCommand::DevEui)
    }

    /// Runs the three stages, reporting progress to `sink`. Any failure is
    /// reported once as "not responding"; the detailed cause is returned.
    pub fn run_sequence<R: ReportSink>(&mut self, sink: &mut R) -> Result<DevEui, SessionError> {
        let result = self.stages(sink);

        if let Err(e) = result {
            error!("at: sequence aborted: {:?}", e);
            sink.report(Report::NotResponding);
        }

        result
    }

    fn stages<R: ReportSink>(&mut self, sink: &mut R) -> Result<DevEui, SessionError> {
        self.check_connection()?;
        sink.report(Report::Connected);

        let version = self.query_version()?;
        sink.report(Report::Version(&version));

        let identity = self.query_dev_eui()?;
        sink.report(Report::Identity(&identity));

        let eui = format_dev_eui(identity.as_bytes())?;
        sink.report(Report::DevEui(&eui));

        Ok(eui)
    }
}
