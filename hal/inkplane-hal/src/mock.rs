//! Mock implementations for testing
//!
//! Recording transport and delay used by the unit tests of this workspace.
//! Enable the `mock` feature to use them from a dependent crate's tests.

use std::collections::VecDeque;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;

use crate::transport::{FrameMode, SerialTransport};

/// A single observable action on the mock bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusEvent {
    /// Chip-select changed
    Select(bool),
    /// Framing changed
    Mode(FrameMode),
    /// One byte clocked out
    Byte(u8),
}

/// Error injected by [`MockTransport::fail_after_bytes`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

/// Transport that records every bus action and reassembles command frames
///
/// A frame begins with the first byte written in command mode and collects
/// every data-mode byte that follows, mirroring how the panel parses them.
#[derive(Debug, Default)]
pub struct MockTransport {
    events: Vec<BusEvent>,
    frames: Vec<Vec<u8>>,
    mode: Option<FrameMode>,
    selected: bool,
    busy_script: VecDeque<bool>,
    busy_polls: usize,
    byte_budget: Option<usize>,
}

impl MockTransport {
    /// Create a transport that never reports busy
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue busy-line readings; once drained the line reads not-busy
    pub fn script_busy(&mut self, readings: &[bool]) {
        self.busy_script.extend(readings.iter().copied());
    }

    /// Fail every write once `bytes` bytes have gone out
    pub fn fail_after_bytes(&mut self, bytes: usize) {
        self.byte_budget = Some(bytes);
    }

    /// All recorded bus actions in order
    pub fn events(&self) -> &[BusEvent] {
        &self.events
    }

    /// Reassembled command frames in order
    pub fn frames(&self) -> &[Vec<u8>] {
        &self.frames
    }

    /// Frames whose opcode matches `opcode`
    pub fn frames_with_opcode(&self, opcode: u8) -> impl Iterator<Item = &Vec<u8>> {
        self.frames
            .iter()
            .filter(move |f| f.first() == Some(&opcode))
    }

    /// Number of busy-line reads so far
    pub fn busy_polls(&self) -> usize {
        self.busy_polls
    }

    /// Whether chip-select is currently asserted
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Forget recorded events and frames (busy script is kept)
    pub fn clear_log(&mut self) {
        self.events.clear();
        self.frames.clear();
    }
}

impl SerialTransport for MockTransport {
    type Error = MockError;

    fn select(&mut self, enable: bool) -> Result<(), Self::Error> {
        self.selected = enable;
        self.events.push(BusEvent::Select(enable));
        Ok(())
    }

    fn set_mode(&mut self, mode: FrameMode) -> Result<(), Self::Error> {
        self.mode = Some(mode);
        self.events.push(BusEvent::Mode(mode));
        Ok(())
    }

    fn is_busy(&mut self) -> Result<bool, Self::Error> {
        self.busy_polls += 1;
        Ok(self.busy_script.pop_front().unwrap_or(false))
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        for &byte in bytes {
            if let Some(budget) = self.byte_budget.as_mut() {
                if *budget == 0 {
                    return Err(MockError);
                }
                *budget -= 1;
            }

            self.events.push(BusEvent::Byte(byte));
            match (self.mode, self.frames.last_mut()) {
                (Some(FrameMode::Data), Some(frame)) => frame.push(byte),
                _ => self.frames.push(std::vec![byte]),
            }
        }
        Ok(bytes.len())
    }
}

/// Delay that returns immediately and accumulates the requested time
#[derive(Debug, Default, Clone, Copy)]
pub struct MockDelay {
    elapsed_ns: u64,
    calls: usize,
}

impl MockDelay {
    /// Create a delay with zero elapsed time
    pub fn new() -> Self {
        Self::default()
    }

    /// Total requested delay in milliseconds
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ns / 1_000_000
    }

    /// Number of delay calls
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.calls += 1;
        self.elapsed_ns += u64::from(ns);
    }

    fn delay_us(&mut self, us: u32) {
        self.calls += 1;
        self.elapsed_ns += u64::from(us) * 1_000;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.calls += 1;
        self.elapsed_ns += u64::from(ms) * 1_000_000;
    }
}
