use core::fmt;

use embedded_hal::serial::{Read, Write};
use heapless::Vec;

use crate::{
    clock::{elapsed_ms, Clock},
    constants::LINE_LEN,
};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    Timeout,
    SerialError, // overrun, framing, noise...
}

/// One inbound line, CR stripped and LF excluded. Anything past `LINE_LEN`
/// bytes is left in the serial stream.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Line {
    buf: Vec<u8, LINE_LEN>,
}

impl Line {
    pub const fn new() -> Line {
        Line { buf: Vec::new() }
    }

    /// Returns `false` once the line is full.
    pub fn push(&mut self, b: u8) -> bool {
        self.buf.push(b).is_ok()
    }

    pub fn is_full(&self) -> bool {
        self.buf.is_full()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Empty string if the module sent something that isn't UTF-8.
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.buf).unwrap_or("")
    }

    pub fn contains(&self, token: &str) -> bool {
        let token = token.as_bytes();
        if token.is_empty() {
            return true;
        }

        self.buf.windows(token.len()).any(|w| w == token)
    }
}

impl From<&str> for Line {
    fn from(s: &str) -> Self {
        let mut line = Line::new();
        for b in s.bytes() {
            if !line.push(b) {
                break;
            }
        }
        line
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.buf.iter() {
            fmt::Write::write_char(f, b as char)?;
        }
        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Line {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=[u8]:a}", self.as_bytes())
    }
}

/// Line-oriented view over a byte-wide serial port (the HAL's `LpUart`, or
/// anything else implementing the embedded-hal 0.2 serial traits).
pub struct LineTransport<S, C> {
    serial: S,
    clock: C,
}

impl<S, C> LineTransport<S, C>
where
    S: Read<u8> + Write<u8>,
    C: Clock,
{
    pub fn new(serial: S, clock: C) -> LineTransport<S, C> {
        LineTransport { serial, clock }
    }

    /// Blocks on the port's own flow control; no timeout here.
    pub fn send(&mut self, text: &str) -> Result<(), TransportError> {
        for b in text.bytes() {
            nb::block!(self.serial.write(b)).map_err(|_| TransportError::SerialError)?;
        }
        nb::block!(self.serial.flush()).map_err(|_| TransportError::SerialError)?;

        Ok(())
    }

    /// Waits up to `timeout_ms` for the first byte only. After that the line
    /// is read to LF or until `LINE_LEN` bytes are buffered, whichever comes first.
    pub fn read_line(&mut self, timeout_ms: u32) -> Result<Line, TransportError> {
        let mut byte = self.wait_first_byte(timeout_ms)?;
        let mut line = Line::new();

        loop {
            match byte {
                b'\n' => break,
                b'\r' => {}
                _ => {
                    line.push(byte);
                }
            }

            if line.is_full() {
                debug!("transport: line truncated at {} bytes", LINE_LEN);
                break;
            }

            byte = nb::block!(self.serial.read()).map_err(|_| {
                error!("transport: serial error mid-line");
                TransportError::SerialError
            })?;
        }

        Ok(line)
    }

    fn wait_first_byte(&mut self, timeout_ms: u32) -> Result<u8, TransportError> {
        let start = self.clock.now_ms();

        loop {
            match self.serial.read() {
                Ok(b) => return Ok(b),
                Err(nb::Error::WouldBlock) => {
                    if elapsed_ms(start, self.clock.now_ms()) >= timeout_ms {
                        return Err(TransportError::Timeout);
                    }
                }
                Err(nb::Error::Other(_)) => {
                    error!("transport: serial error while waiting for data");
                    return Err(TransportError::SerialError);
                }
            }
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn serial(&self) -> &S {
        &self.serial
    }

    pub fn serial_mut(&mut self) -> &mut S {
        &mut self.serial
    }

    pub fn free(self) -> (S, C) {
        (self.serial, self.clock)
    }
}
