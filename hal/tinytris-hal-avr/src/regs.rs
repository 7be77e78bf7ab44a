//! TWI0 register map
//!
//! Offsets and bit positions follow the tinyAVR 0/1-series datasheet
//! (TWI chapter, master registers only).

/// Base address of TWI0 in the data space
pub const TWI0_BASE: usize = 0x0810;

/// TWI0 master-side registers, by offset from the peripheral base
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Reg {
    /// Shared control (SDA setup/hold, fast-mode-plus enable)
    Ctrla = 0x00,
    /// Debug control
    Dbgctrl = 0x02,
    /// Master control A (enable, interrupts, smart mode)
    Mctrla = 0x03,
    /// Master control B (command, acknowledge action, flush)
    Mctrlb = 0x04,
    /// Master status flags and bus state
    Mstatus = 0x05,
    /// Master baud divisor
    Mbaud = 0x06,
    /// Master address (writing it issues START)
    Maddr = 0x07,
    /// Master data
    Mdata = 0x08,
}

/// Register bit masks and group configurations
pub mod bits {
    /// CTRLA: fast mode plus enable
    pub const FMPEN: u8 = 1 << 1;

    /// MCTRLA: master enable
    pub const ENABLE: u8 = 1 << 0;

    /// MCTRLB: command field, byte read/acknowledge
    pub const MCMD_RECVTRANS: u8 = 0x02;
    /// MCTRLB: command field, stop condition
    pub const MCMD_STOP: u8 = 0x03;
    /// MCTRLB: acknowledge action (set = NACK)
    pub const ACKACT: u8 = 1 << 2;

    /// MSTATUS: read interrupt flag
    pub const RIF: u8 = 1 << 7;
    /// MSTATUS: write interrupt flag
    pub const WIF: u8 = 1 << 6;
    /// MSTATUS: SCL held low
    pub const CLKHOLD: u8 = 1 << 5;
    /// MSTATUS: received acknowledge (set = NACK)
    pub const RXACK: u8 = 1 << 4;
    /// MSTATUS: arbitration lost
    pub const ARBLOST: u8 = 1 << 3;
    /// MSTATUS: illegal bus condition
    pub const BUSERR: u8 = 1 << 2;
    /// MSTATUS: bus state field, forced idle
    pub const BUSSTATE_IDLE: u8 = 0x01;
}

/// Access to a TWI0 register block
///
/// Reads take `&mut self` because status reads are the clock the polling
/// engine runs on; a simulated block advances its state on each one.
pub trait TwiRegisters {
    /// Read a register
    fn read(&mut self, reg: Reg) -> u8;

    /// Write a register
    fn write(&mut self, reg: Reg, value: u8);
}

/// The memory-mapped peripheral
#[derive(Debug)]
pub struct Mmio {
    base: usize,
}

#[allow(unsafe_code)]
impl Mmio {
    /// Register block at an arbitrary base address
    ///
    /// # Safety
    /// `base` must be the address of a TWI register block, and no other
    /// `Mmio` for the same block may exist.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    /// The on-chip TWI0 instance
    ///
    /// # Safety
    /// Must be called at most once; the returned value owns the peripheral.
    pub const unsafe fn twi0() -> Self {
        Self::new(TWI0_BASE)
    }

    fn addr(&self, reg: Reg) -> *mut u8 {
        (self.base + reg as usize) as *mut u8
    }
}

#[allow(unsafe_code)]
impl TwiRegisters for Mmio {
    fn read(&mut self, reg: Reg) -> u8 {
        // SAFETY: construction guarantees `base` points at the peripheral
        unsafe { core::ptr::read_volatile(self.addr(reg)) }
    }

    fn write(&mut self, reg: Reg, value: u8) {
        // SAFETY: as above
        unsafe { core::ptr::write_volatile(self.addr(reg), value) }
    }
}
