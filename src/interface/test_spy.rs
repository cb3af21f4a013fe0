//! Interfaces for use in unit tests to spy on whatever was sent to them.
//!
//! `TestSpyInterface` records whole frames as the display driver issues them, `TestSpyTransport`
//! records the individual bus sessions a `Framer` produces. Both can be `split` so a test can keep
//! a handle for inspection after moving the other one into the code under test, and both can be
//! told to fail a particular frame or session with a given status code.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;

use super::{DisplayInterface, Marker, Transport};
use crate::error::BusError;

/// Expected frame lists for `TestSpyInterface::check_multi`. `[op, args..]` is a command frame and
/// `{bytes..}` is a data frame.
macro_rules! send {
    ({$($d:expr),* $(,)*}) => {$crate::interface::test_spy::Sent::Data(vec![$($d,)*])};
    ([$c:expr $(, $a:expr)* $(,)*]) => {$crate::interface::test_spy::Sent::Cmd($c, vec![$($a,)*])};
}
macro_rules! sends {
    ($($e:tt),* $(,)*) => {&[$(send!($e),)*]};
}

static INIT: Once = Once::new();

pub fn setup_log() {
    INIT.call_once(|| {
        simple_logger::init().unwrap();
    });
}

/// One frame as seen by a `TestSpyInterface`.
#[derive(Clone, Debug, PartialEq)]
pub enum Sent {
    Cmd(u8, Vec<u8>),
    Data(Vec<u8>),
}

#[derive(Default)]
struct FrameLog {
    sent: Vec<Sent>,
    frames: usize,
    failures: Vec<(usize, u8)>,
    reset_line: bool,
    resets: usize,
}

impl FrameLog {
    fn status(&mut self) -> Result<(), BusError> {
        let index = self.frames;
        self.frames += 1;
        match self.failures.iter().find(|(i, _)| *i == index) {
            Some(&(_, code)) => BusError::check(code),
            None => Ok(()),
        }
    }
}

#[derive(Clone)]
pub struct TestSpyInterface {
    log: Rc<RefCell<FrameLog>>,
}

impl TestSpyInterface {
    pub fn new() -> Self {
        TestSpyInterface {
            log: Rc::new(RefCell::new(FrameLog::default())),
        }
    }

    /// Make `hardware_reset` report that a reset line was pulsed.
    pub fn with_reset_line(self) -> Self {
        self.log.borrow_mut().reset_line = true;
        self
    }

    /// Another handle onto the same record.
    pub fn split(&self) -> Self {
        self.clone()
    }

    /// Fail the `index`th frame sent through this spy (counting from 0, across `clear`s) with
    /// status `code`. The frame is still recorded.
    pub fn fail_frame(&self, index: usize, code: u8) {
        self.log.borrow_mut().failures.push((index, code));
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.log.borrow().sent.clone()
    }

    pub fn resets(&self) -> usize {
        self.log.borrow().resets
    }

    pub fn check(&self, cmd: u8, args: &[u8]) {
        assert_eq!(
            self.log.borrow().sent.last(),
            Some(&Sent::Cmd(cmd, args.to_vec()))
        );
    }

    pub fn check_multi(&self, expected: &[Sent]) {
        assert_eq!(&self.log.borrow().sent[..], expected);
    }

    pub fn clear(&self) {
        self.log.borrow_mut().sent.clear()
    }
}

impl DisplayInterface for TestSpyInterface {
    fn send_command(&mut self, opcode: u8, args: &[u8]) -> Result<(), BusError> {
        let mut log = self.log.borrow_mut();
        log.sent.push(Sent::Cmd(opcode, args.to_vec()));
        log.status()
    }

    fn send_data<I>(&mut self, data: I) -> Result<(), BusError>
    where
        I: IntoIterator<Item = u8>,
    {
        let mut log = self.log.borrow_mut();
        log.sent.push(Sent::Data(data.into_iter().collect()));
        log.status()
    }

    fn hardware_reset<D: DelayNs>(&mut self, delay: &mut D) -> bool {
        let mut log = self.log.borrow_mut();
        if log.reset_line {
            log.resets += 1;
            delay.delay_ms(200);
        }
        log.reset_line
    }
}

/// One bus session as seen by a `TestSpyTransport`.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub marker: Option<Marker>,
    /// How many times a marker was written in this session.
    pub markers: usize,
    pub bytes: Vec<u8>,
}

impl Session {
    pub fn new(marker: Marker, bytes: &[u8]) -> Self {
        Session {
            marker: Some(marker),
            markers: 1,
            bytes: bytes.to_vec(),
        }
    }
}

struct SessionLog {
    max_chunk: usize,
    header_len: usize,
    sessions: Vec<Session>,
    current: Option<Session>,
    failures: Vec<(usize, u8)>,
}

#[derive(Clone)]
pub struct TestSpyTransport {
    log: Rc<RefCell<SessionLog>>,
}

impl TestSpyTransport {
    pub fn new(max_chunk: usize, header_len: usize) -> Self {
        TestSpyTransport {
            log: Rc::new(RefCell::new(SessionLog {
                max_chunk,
                header_len,
                sessions: Vec::new(),
                current: None,
                failures: Vec::new(),
            })),
        }
    }

    pub fn split(&self) -> Self {
        self.clone()
    }

    /// Fail the `index`th session (counting from 0) with status `code` when it is closed.
    pub fn fail_session(&self, index: usize, code: u8) {
        self.log.borrow_mut().failures.push((index, code));
    }

    /// All closed sessions, oldest first.
    pub fn sessions(&self) -> Vec<Session> {
        self.log.borrow().sessions.clone()
    }
}

impl Transport for TestSpyTransport {
    fn header_len(&self) -> usize {
        self.log.borrow().header_len
    }

    fn max_chunk(&self) -> usize {
        self.log.borrow().max_chunk
    }

    fn open(&mut self) {
        let mut log = self.log.borrow_mut();
        assert!(log.current.is_none(), "session opened twice");
        log.current = Some(Session {
            marker: None,
            markers: 0,
            bytes: Vec::new(),
        });
    }

    fn write_marker(&mut self, marker: Marker) {
        let mut log = self.log.borrow_mut();
        let session = log.current.as_mut().expect("marker outside of a session");
        session.marker = Some(marker);
        session.markers += 1;
    }

    fn write_byte(&mut self, byte: u8) {
        let mut log = self.log.borrow_mut();
        let session = log.current.as_mut().expect("write outside of a session");
        session.bytes.push(byte);
    }

    fn close(&mut self) -> Result<(), BusError> {
        let mut log = self.log.borrow_mut();
        let session = log.current.take().expect("close without open");
        let index = log.sessions.len();
        log.sessions.push(session);
        match log.failures.iter().find(|(i, _)| *i == index) {
            Some(&(_, code)) => BusError::check(code),
            None => Ok(()),
        }
    }
}

/// A `DelayNs` that only adds up how long it was asked to wait.
#[derive(Default)]
pub struct TestDelay {
    pub total_ns: u64,
}

impl DelayNs for TestDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}
