//! Scripted stand-in for the LoRa module and a clock that ticks on every read.
#![allow(dead_code)]

use std::cell::Cell;
use std::collections::{HashMap, VecDeque};
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::serial::{Read, Write};
use lora_at_probe::at::{Report, ReportSink};
use lora_at_probe::clock::Clock;

/// Advances 1 ms every time it is read. Clones share the same counter.
#[derive(Clone, Default)]
pub struct StepClock(Rc<Cell<u32>>);

impl StepClock {
    pub fn starting_at(ms: u32) -> StepClock {
        StepClock(Rc::new(Cell::new(ms)))
    }

    pub fn peek(&self) -> u32 {
        self.0.get()
    }
}

impl Clock for StepClock {
    fn now_ms(&self) -> u32 {
        let now = self.0.get();
        self.0.set(now.wrapping_add(1));
        now
    }
}

#[derive(Clone, Debug)]
pub enum Reply {
    Line(&'static str),
    Silence,
}

/// Replies to each complete CRLF-terminated command with the next scripted
/// reply for it. The last scripted reply repeats forever.
#[derive(Default)]
pub struct MockModule {
    rx: VecDeque<u8>,
    pending: Vec<u8>,
    script: HashMap<String, VecDeque<Reply>>,
    pub commands: Vec<String>,
    pub written: Vec<u8>,
}

impl MockModule {
    pub fn new() -> MockModule {
        MockModule::default()
    }

    pub fn on(mut self, cmd: &str, replies: impl IntoIterator<Item = Reply>) -> MockModule {
        self.script
            .insert(cmd.to_string(), replies.into_iter().collect());
        self
    }

    pub fn feed(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }

    pub fn unread(&self) -> usize {
        self.rx.len()
    }

    pub fn count(&self, cmd: &str) -> usize {
        self.commands.iter().filter(|c| c.as_str() == cmd).count()
    }

    fn answer(&mut self, cmd: &str) {
        let reply = match self.script.get_mut(cmd) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };

        if let Some(Reply::Line(text)) = reply {
            self.rx.extend(text.bytes());
            self.rx.extend(b"\r\n".iter().copied());
        }
    }
}

impl Read<u8> for MockModule {
    type Error = Infallible;

    fn read(&mut self) -> nb::Result<u8, Infallible> {
        self.rx.pop_front().ok_or(nb::Error::WouldBlock)
    }
}

impl Write<u8> for MockModule {
    type Error = Infallible;

    fn write(&mut self, word: u8) -> nb::Result<(), Infallible> {
        self.written.push(word);
        self.pending.push(word);

        if self.pending.ends_with(b"\r\n") {
            let cmd = String::from_utf8_lossy(&self.pending).into_owned();
            self.pending.clear();
            self.commands.push(cmd.clone());
            self.answer(&cmd);
        }

        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Infallible> {
        Ok(())
    }
}

/// Port whose receiver always reports a hardware error.
pub struct BrokenPort;

impl Read<u8> for BrokenPort {
    type Error = ();

    fn read(&mut self) -> nb::Result<u8, ()> {
        Err(nb::Error::Other(()))
    }
}

impl Write<u8> for BrokenPort {
    type Error = ();

    fn write(&mut self, _word: u8) -> nb::Result<(), ()> {
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), ()> {
        Ok(())
    }
}

/// Collects the console lines the session would print.
#[derive(Default)]
pub struct RecordingSink {
    pub lines: Vec<String>,
}

impl ReportSink for RecordingSink {
    fn report(&mut self, report: Report<'_>) {
        self.lines.push(report.to_string());
    }
}

pub const VERSION_REPLY: &str = "+VER: 4.0.11";
pub const DEV_EUI_REPLY: &str = "+ID: DevEui, DE:AD:BE:EF:00:11:22:33";

pub fn healthy_module() -> MockModule {
    MockModule::new()
        .on("AT\r\n", [Reply::Line("+AT: OK")])
        .on("AT+VER\r\n", [Reply::Line(VERSION_REPLY)])
        .on("AT+ID=DevEui\r\n", [Reply::Line(DEV_EUI_REPLY)])
}
