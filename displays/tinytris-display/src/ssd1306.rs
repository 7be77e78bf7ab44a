//! SSD1306 OLED protocol driver
//!
//! Driver for 128x64 SSD1306 panels on a polled two-wire bus. There is no
//! frame buffer: callers set an addressing window and then stream pixel
//! bytes into it, one byte per page column, in the controller's horizontal
//! addressing order.
//!
//! Every transaction starts with a control byte: [`COMMAND_MARKER`] for a
//! run of commands, [`DATA_MARKER`] for a run of RAM bytes.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use tinytris_hal::{BusError, Direction, TwiMaster};

use crate::error::DisplayError;

/// Default 7-bit bus address
pub const DEFAULT_ADDRESS: u8 = 0x3C;

/// Control byte opening a command transaction
pub const COMMAND_MARKER: u8 = 0x00;

/// Control byte opening a data transaction
pub const DATA_MARKER: u8 = 0x40;

/// Last page index
pub const MAX_PAGE: u8 = 7;

/// Last column index
pub const MAX_COLUMN: u8 = 127;

/// Bytes in display RAM
pub const RAM_SIZE: u16 = (MAX_PAGE as u16 + 1) * (MAX_COLUMN as u16 + 1);

/// SSD1306 commands
pub mod cmd {
    pub const RESET_DISPLAY_MODE: u8 = 0xE4;
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
    pub const SET_ADDRESSING_MODE: u8 = 0x20;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_PAGE_RANGE: u8 = 0x22;
    pub const SET_COLUMN_RANGE: u8 = 0x21;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const RESUME_FROM_RAM: u8 = 0xA4;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_INVERSE: u8 = 0xA7;
}

/// Power-up command table, sent as one command transaction
pub const INIT_SEQUENCE: [u8; 28] = [
    cmd::RESET_DISPLAY_MODE,
    cmd::DISPLAY_OFF,
    cmd::SET_MUX_RATIO,
    0x3F, // 64 lines
    cmd::SET_DISPLAY_OFFSET,
    0x00,
    cmd::SET_START_LINE,
    cmd::SET_CHARGE_PUMP,
    0x14, // Enable charge pump
    cmd::SET_ADDRESSING_MODE,
    0x00, // Horizontal
    cmd::SET_COM_PINS,
    0x12,
    cmd::SET_CONTRAST,
    DEFAULT_CONTRAST,
    cmd::SET_PRECHARGE,
    0xFF,
    cmd::SET_VCOM_DETECT,
    0x20,
    cmd::SET_PAGE_RANGE,
    0x00,
    MAX_PAGE,
    cmd::SET_COLUMN_RANGE,
    0x00,
    MAX_COLUMN,
    cmd::SET_SEG_REMAP,
    cmd::RESUME_FROM_RAM,
    cmd::DISPLAY_ON,
];

/// Position of the contrast operand in [`INIT_SEQUENCE`]
const CONTRAST_INDEX: usize = 14;

/// Contrast set by the init table
pub const DEFAULT_CONTRAST: u8 = 0xA0;

/// Driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// 7-bit bus address
    pub address: u8,
    /// Contrast written during init
    pub contrast: u8,
    /// Extra attempts for a failed command transaction
    pub command_retries: u8,
}

impl DisplayConfig {
    /// Stock module at 0x3C
    pub const DEFAULT: Self = Self {
        address: DEFAULT_ADDRESS,
        contrast: DEFAULT_CONTRAST,
        command_retries: 2,
    };

    /// Same settings at another address (0x3D with SA0 tied high)
    pub const fn with_address(self, address: u8) -> Self {
        Self { address, ..self }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// SSD1306 driver over a [`TwiMaster`]
pub struct Ssd1306<B> {
    bus: B,
    config: DisplayConfig,
}

impl<B: TwiMaster> Ssd1306<B> {
    /// Create a driver; nothing is sent until [`send_init_sequence`]
    ///
    /// [`send_init_sequence`]: Ssd1306::send_init_sequence
    pub fn new(bus: B, config: DisplayConfig) -> Self {
        Self { bus, config }
    }

    /// Get the configuration
    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Borrow the bus
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Release the bus
    pub fn release(self) -> B {
        self.bus
    }

    /// Power the panel up with the stock command table
    pub fn send_init_sequence(&mut self) -> Result<(), DisplayError> {
        let mut table = INIT_SEQUENCE;
        table[CONTRAST_INDEX] = self.config.contrast;
        self.command(&table)
    }

    /// Restrict RAM writes to a page and column range (inclusive)
    ///
    /// The controller wraps within the window, so the next data stream
    /// fills it page by page.
    pub fn set_window(
        &mut self,
        page_start: u8,
        page_end: u8,
        column_start: u8,
        column_end: u8,
    ) -> Result<(), DisplayError> {
        if page_end > MAX_PAGE
            || column_end > MAX_COLUMN
            || page_start > page_end
            || column_start > column_end
        {
            return Err(DisplayError::InvalidWindow);
        }
        self.command(&[
            cmd::SET_PAGE_RANGE,
            page_start,
            page_end,
            cmd::SET_COLUMN_RANGE,
            column_start,
            column_end,
        ])
    }

    /// Open a data transaction
    ///
    /// The returned stream holds the bus until it is ended or dropped.
    pub fn begin_data_stream(&mut self) -> Result<DataStream<'_, B>, DisplayError> {
        open(&mut self.bus, self.config.address)?;
        let mut stream = DataStream {
            bus: &mut self.bus,
            open: true,
            failure: None,
        };
        stream.send(DATA_MARKER)?;
        Ok(stream)
    }

    /// Blank all of display RAM
    pub fn clear(&mut self) -> Result<(), DisplayError> {
        self.set_window(0, MAX_PAGE, 0, MAX_COLUMN)?;
        let mut stream = self.begin_data_stream()?;
        for _ in 0..RAM_SIZE {
            stream.write_data_byte(0x00)?;
        }
        stream.end_data_stream()
    }

    /// Turn the panel on or off (RAM is kept)
    pub fn set_display_on(&mut self, on: bool) -> Result<(), DisplayError> {
        if on {
            self.command(&[cmd::DISPLAY_ON])
        } else {
            self.command(&[cmd::DISPLAY_OFF])
        }
    }

    /// Set contrast (0-255)
    pub fn set_contrast(&mut self, contrast: u8) -> Result<(), DisplayError> {
        self.command(&[cmd::SET_CONTRAST, contrast])
    }

    /// Invert display colors
    pub fn set_inverted(&mut self, inverted: bool) -> Result<(), DisplayError> {
        if inverted {
            self.command(&[cmd::SET_INVERSE])
        } else {
            self.command(&[cmd::SET_NORMAL])
        }
    }

    /// Send a command transaction, retrying on bus errors
    fn command(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        let mut attempt = 0;
        loop {
            match self.command_once(bytes) {
                Ok(()) => return Ok(()),
                Err(error) if attempt < self.config.command_retries => {
                    attempt += 1;
                    #[cfg(feature = "defmt")]
                    defmt::warn!("display command failed ({}), retry {}", error, attempt);
                    #[cfg(not(feature = "defmt"))]
                    let _ = error;
                }
                Err(error) => {
                    #[cfg(feature = "defmt")]
                    defmt::error!("display command failed: {}", error);
                    return Err(error.into());
                }
            }
        }
    }

    fn command_once(&mut self, bytes: &[u8]) -> Result<(), BusError> {
        open(&mut self.bus, self.config.address)?;
        let result = core::iter::once(&COMMAND_MARKER)
            .chain(bytes)
            .try_for_each(|&byte| self.bus.write_byte(byte));
        self.bus.stop();
        result
    }
}

/// Issue a write start, releasing the bus again if the device refused
fn open<B: TwiMaster>(bus: &mut B, address: u8) -> Result<(), BusError> {
    match bus.start(address, Direction::Write) {
        Ok(()) => Ok(()),
        // Another master owns the bus, there is nothing to stop
        Err(BusError::ArbitrationLost) => Err(BusError::ArbitrationLost),
        Err(error) => {
            bus.stop();
            Err(error)
        }
    }
}

/// An open data transaction
///
/// Borrows the driver's bus, so no other transaction can start while it is
/// alive. A byte that fails closes the stream; later writes return the same
/// error without touching the bus. Dropping an open stream sends the stop.
pub struct DataStream<'a, B: TwiMaster> {
    bus: &'a mut B,
    open: bool,
    failure: Option<BusError>,
}

impl<B: TwiMaster> DataStream<'_, B> {
    fn send(&mut self, byte: u8) -> Result<(), DisplayError> {
        if let Some(error) = self.failure {
            return Err(error.into());
        }
        if let Err(error) = self.bus.write_byte(byte) {
            #[cfg(feature = "defmt")]
            defmt::warn!("data stream aborted: {}", error);
            self.bus.stop();
            self.open = false;
            self.failure = Some(error);
            return Err(error.into());
        }
        Ok(())
    }

    /// Send one pixel byte
    pub fn write_data_byte(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.send(byte)
    }

    /// Close the transaction
    ///
    /// Reports the error that aborted the stream, if any.
    pub fn end_data_stream(mut self) -> Result<(), DisplayError> {
        if self.open {
            self.bus.stop();
            self.open = false;
        }
        match self.failure {
            Some(error) => Err(error.into()),
            None => Ok(()),
        }
    }
}

impl<B: TwiMaster> Drop for DataStream<'_, B> {
    fn drop(&mut self) {
        if self.open {
            self.bus.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinytris_hal::{BusEvent, MockTwi};

    fn driver() -> Ssd1306<MockTwi> {
        Ssd1306::new(MockTwi::new(), DisplayConfig::default())
    }

    #[test]
    fn test_init_table_length() {
        assert_eq!(INIT_SEQUENCE.len(), 28);
        assert_eq!(INIT_SEQUENCE[CONTRAST_INDEX - 1], cmd::SET_CONTRAST);
        assert_eq!(INIT_SEQUENCE[CONTRAST_INDEX], DEFAULT_CONTRAST);
    }

    #[test]
    fn test_init_is_one_command_transaction() {
        let mut display = driver();
        display.send_init_sequence().unwrap();

        let bus = display.bus();
        assert_eq!(bus.transaction_count(), 1);
        assert_eq!(
            bus.transaction(0).unwrap().first(),
            Some(&BusEvent::Start {
                address: 0x3C,
                direction: Direction::Write
            })
        );
        let written = bus.written(0);
        assert_eq!(written.len(), 29);
        assert_eq!(written[0], COMMAND_MARKER);
        assert_eq!(&written[1..], &INIT_SEQUENCE[..]);
        assert!(!bus.is_open());
        assert_eq!(bus.violations(), 0);
    }

    #[test]
    fn test_init_uses_configured_contrast() {
        let config = DisplayConfig {
            contrast: 0x30,
            ..DisplayConfig::default()
        };
        let mut display = Ssd1306::new(MockTwi::new(), config);
        display.send_init_sequence().unwrap();
        assert_eq!(display.bus().written(0)[1 + CONTRAST_INDEX], 0x30);
    }

    #[test]
    fn test_set_window_framing() {
        let mut display = driver();
        display.set_window(0, 5, 0, 127).unwrap();
        assert_eq!(
            display.bus().written(0).as_slice(),
            &[0x00, 0x22, 0, 5, 0x21, 0, 127]
        );
    }

    #[test]
    fn test_invalid_window_touches_nothing() {
        let mut display = driver();
        assert_eq!(display.set_window(0, 8, 0, 127), Err(DisplayError::InvalidWindow));
        assert_eq!(display.set_window(0, 7, 0, 128), Err(DisplayError::InvalidWindow));
        assert_eq!(display.set_window(3, 2, 0, 10), Err(DisplayError::InvalidWindow));
        assert_eq!(display.set_window(0, 0, 10, 9), Err(DisplayError::InvalidWindow));
        assert!(display.bus().events().is_empty());
    }

    #[test]
    fn test_data_stream_framing() {
        let mut display = driver();
        let mut stream = display.begin_data_stream().unwrap();
        stream.write_data_byte(0xAA).unwrap();
        stream.write_data_byte(0x55).unwrap();
        stream.end_data_stream().unwrap();

        let bus = display.bus();
        assert_eq!(bus.written(0).as_slice(), &[DATA_MARKER, 0xAA, 0x55]);
        assert_eq!(bus.transaction(0).unwrap().last(), Some(&BusEvent::Stop));
        assert!(!bus.is_open());
    }

    #[test]
    fn test_dropped_stream_sends_stop() {
        let mut display = driver();
        {
            let mut stream = display.begin_data_stream().unwrap();
            stream.write_data_byte(0x01).unwrap();
        }
        assert!(!display.bus().is_open());
        assert_eq!(display.bus().events().last(), Some(&BusEvent::Stop));
        assert_eq!(display.bus().violations(), 0);
    }

    #[test]
    fn test_stream_aborts_after_nack() {
        let mut display = driver();
        let mut stream = display.begin_data_stream().unwrap();
        stream.write_data_byte(0x01).unwrap();
        stream.bus.fail_write(1, BusError::NotAcknowledged);
        assert_eq!(
            stream.write_data_byte(0x02),
            Err(DisplayError::Bus(BusError::NotAcknowledged))
        );
        assert_eq!(
            stream.write_data_byte(0x03),
            Err(DisplayError::Bus(BusError::NotAcknowledged))
        );
        assert_eq!(
            stream.end_data_stream(),
            Err(DisplayError::Bus(BusError::NotAcknowledged))
        );

        let bus = display.bus();
        assert_eq!(bus.written(0).as_slice(), &[DATA_MARKER, 0x01, 0x02]);
        assert_eq!(bus.events().last(), Some(&BusEvent::Stop));
        assert_eq!(bus.violations(), 0);
    }

    #[test]
    fn test_start_nack_is_stopped() {
        let mut bus = MockTwi::new();
        bus.fail_next_start(BusError::NotAcknowledged);
        let mut display = Ssd1306::new(bus, DisplayConfig::default());

        assert!(matches!(
            display.begin_data_stream(),
            Err(DisplayError::Bus(BusError::NotAcknowledged))
        ));
        assert!(!display.bus().is_open());
        assert_eq!(display.bus().events().last(), Some(&BusEvent::Stop));
    }

    #[test]
    fn test_arbitration_loss_is_not_stopped() {
        let mut bus = MockTwi::new();
        bus.fail_next_start(BusError::ArbitrationLost);
        let mut display = Ssd1306::new(bus, DisplayConfig::default());

        assert!(display.begin_data_stream().is_err());
        assert!(!display
            .bus()
            .events()
            .iter()
            .any(|e| matches!(e, BusEvent::Stop)));
        assert_eq!(display.bus().violations(), 0);
    }

    #[test]
    fn test_command_retried() {
        let mut bus = MockTwi::new();
        bus.fail_next_start(BusError::NotAcknowledged);
        let mut display = Ssd1306::new(bus, DisplayConfig::default());

        display.set_contrast(0x7F).unwrap();

        let bus = display.bus();
        assert_eq!(bus.transaction_count(), 2);
        assert_eq!(bus.written(1).as_slice(), &[COMMAND_MARKER, cmd::SET_CONTRAST, 0x7F]);
        assert_eq!(bus.violations(), 0);
    }

    #[test]
    fn test_command_gives_up_after_retries() {
        let mut bus = MockTwi::new();
        bus.fail_write(1, BusError::Timeout);
        let config = DisplayConfig {
            command_retries: 0,
            ..DisplayConfig::default()
        };
        let mut display = Ssd1306::new(bus, config);

        assert_eq!(
            display.set_display_on(true),
            Err(DisplayError::Bus(BusError::Timeout))
        );
        let bus = display.bus();
        assert_eq!(bus.transaction_count(), 1);
        // Nothing follows the failed marker byte but the stop
        assert_eq!(bus.written(0).as_slice(), &[COMMAND_MARKER]);
        assert!(!bus.is_open());
    }

    #[test]
    fn test_single_byte_commands() {
        let mut display = driver();
        display.set_display_on(false).unwrap();
        display.set_display_on(true).unwrap();
        display.set_inverted(true).unwrap();
        display.set_inverted(false).unwrap();

        let bus = display.bus();
        assert_eq!(bus.written(0).as_slice(), &[0x00, 0xAE]);
        assert_eq!(bus.written(1).as_slice(), &[0x00, 0xAF]);
        assert_eq!(bus.written(2).as_slice(), &[0x00, 0xA7]);
        assert_eq!(bus.written(3).as_slice(), &[0x00, 0xA6]);
    }

    #[test]
    fn test_clear_writes_all_ram() {
        let mut display = driver();
        display.clear().unwrap();

        let bus = display.bus();
        assert!(!bus.overflowed());
        assert_eq!(bus.transaction_count(), 2);
        assert_eq!(
            bus.written(0).as_slice(),
            &[0x00, 0x22, 0, 7, 0x21, 0, 127]
        );
        let data = bus.written(1);
        assert_eq!(data.len(), 1 + RAM_SIZE as usize);
        assert_eq!(data[0], DATA_MARKER);
        assert!(data[1..].iter().all(|&b| b == 0));
    }
}
