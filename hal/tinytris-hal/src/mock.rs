//! Recording bus double
//!
//! `MockTwi` keeps every phase it is asked to perform and can be primed to
//! fail a start or a specific data byte, so the display driver and renderer
//! can be checked byte-for-byte on the host.

use heapless::{Deque, Vec};

use crate::i2c::{BusError, Direction, TwiMaster};

/// Maximum number of recorded phases (a full-screen clear plus framing fits)
pub const EVENT_CAPACITY: usize = 4096;

/// One recorded bus phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusEvent {
    /// Start condition + address byte (recorded even when it fails)
    Start { address: u8, direction: Direction },
    /// Byte shifted out (recorded even when NACKed)
    Write(u8),
    /// Byte shifted in
    Read(u8),
    /// Stop condition
    Stop,
}

/// In-memory bus that records transactions
pub struct MockTwi {
    events: Vec<BusEvent, EVENT_CAPACITY>,
    /// Transaction currently open (a stop is owed)
    open: bool,
    /// Phases that broke the transaction discipline
    violations: u16,
    /// Fail the next start with this error
    start_failure: Option<BusError>,
    /// Fail the write that brings `writes` to this count
    write_failure: Option<(u32, BusError)>,
    writes: u32,
    /// Bytes handed out by `read_byte`
    read_data: Deque<u8, 64>,
    /// Recording stopped because the buffer filled up
    overflowed: bool,
}

impl Default for MockTwi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTwi {
    /// Create an empty, always-acknowledging bus
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            open: false,
            violations: 0,
            start_failure: None,
            write_failure: None,
            writes: 0,
            read_data: Deque::new(),
            overflowed: false,
        }
    }

    /// Make the next `start` fail with `error`
    pub fn fail_next_start(&mut self, error: BusError) {
        self.start_failure = Some(error);
    }

    /// Make the `n`th `write_byte` from now (1-based) fail with `error`
    pub fn fail_write(&mut self, n: u32, error: BusError) {
        self.write_failure = Some((self.writes + n, error));
    }

    /// Queue bytes for subsequent `read_byte` calls
    pub fn queue_read(&mut self, bytes: &[u8]) {
        for &b in bytes {
            let _ = self.read_data.push_back(b);
        }
    }

    /// Forget everything recorded so far (failure priming is kept)
    pub fn clear(&mut self) {
        self.events.clear();
        self.violations = 0;
        self.overflowed = false;
    }

    /// All recorded phases
    pub fn events(&self) -> &[BusEvent] {
        &self.events
    }

    /// Number of phases issued out of order (start while open, data or
    /// stop while closed)
    pub fn violations(&self) -> u16 {
        self.violations
    }

    /// Whether a transaction is still waiting for its stop
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether more phases were issued than could be recorded
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    /// Number of start conditions recorded
    pub fn transaction_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, BusEvent::Start { .. }))
            .count()
    }

    /// Phases of the `index`th transaction, from its start up to and
    /// including its stop (or to the end of the record if none followed)
    pub fn transaction(&self, index: usize) -> Option<&[BusEvent]> {
        let begin = self
            .events
            .iter()
            .enumerate()
            .filter(|(_, e)| matches!(e, BusEvent::Start { .. }))
            .nth(index)
            .map(|(i, _)| i)?;

        let rest = &self.events[begin + 1..];
        let len = rest
            .iter()
            .position(|e| matches!(e, BusEvent::Stop | BusEvent::Start { .. }))
            .map(|p| match rest[p] {
                BusEvent::Stop => p + 1,
                _ => p,
            })
            .unwrap_or(rest.len());

        Some(&self.events[begin..begin + 1 + len])
    }

    /// Bytes written during the `index`th transaction
    pub fn written(&self, index: usize) -> Vec<u8, EVENT_CAPACITY> {
        let mut out = Vec::new();
        if let Some(events) = self.transaction(index) {
            for event in events {
                if let BusEvent::Write(b) = event {
                    let _ = out.push(*b);
                }
            }
        }
        out
    }

    fn record(&mut self, event: BusEvent) {
        if self.events.push(event).is_err() {
            self.overflowed = true;
        }
    }
}

impl TwiMaster for MockTwi {
    fn start(&mut self, address: u8, direction: Direction) -> Result<(), BusError> {
        if self.open {
            self.violations += 1;
        }
        self.record(BusEvent::Start { address, direction });

        match self.start_failure.take() {
            Some(BusError::ArbitrationLost) => {
                // Another master owns the bus, there is nothing to stop
                self.open = false;
                Err(BusError::ArbitrationLost)
            }
            Some(error) => {
                self.open = true;
                Err(error)
            }
            None => {
                self.open = true;
                Ok(())
            }
        }
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), BusError> {
        if !self.open {
            self.violations += 1;
        }
        self.record(BusEvent::Write(byte));
        self.writes += 1;

        match self.write_failure {
            Some((at, error)) if at == self.writes => {
                self.write_failure = None;
                Err(error)
            }
            _ => Ok(()),
        }
    }

    fn read_byte(&mut self, _last: bool) -> Result<u8, BusError> {
        if !self.open {
            self.violations += 1;
        }
        let byte = self.read_data.pop_front().ok_or(BusError::Timeout)?;
        self.record(BusEvent::Read(byte));
        Ok(byte)
    }

    fn stop(&mut self) {
        if !self.open {
            self.violations += 1;
        }
        self.record(BusEvent::Stop);
        self.open = false;
    }
}
