//! Polled TWI0 master
//!
//! Drives the bus phases by writing the master registers and spinning on
//! MSTATUS. Interrupts are never enabled; the status-flag spin is the only
//! place the CPU waits on the bus.

use embedded_hal::i2c::{ErrorType, I2c, Operation};
use tinytris_hal::{BusError, Direction, PollLimit, SpeedClass, TwiConfig, TwiMaster};

use crate::regs::{bits, Reg, TwiRegisters};

/// MBAUD value and fast-mode-plus flag for a speed preset
///
/// fSCL = fCLK_PER / (10 + 2 * BAUD + fCLK_PER * Trise), at 20 MHz:
/// - 100 kHz, Trise = 1000 ns → 0x55
/// - 400 kHz, Trise = 300 ns → 0x11
/// - 800 kHz → 0x05
/// - ~1.1 MHz, Trise = 120 ns → 0x03 (needs FMPEN drive strength)
pub const fn baud_setting(speed: SpeedClass) -> (u8, bool) {
    match speed {
        SpeedClass::Standard => (0x55, false),
        SpeedClass::Fast => (0x11, false),
        SpeedClass::FastPlus800 => (0x05, false),
        SpeedClass::FastPlus => (0x03, true),
    }
}

/// TWI0 in polled master mode
///
/// Owns the register block, so the bus is configured exactly once and can
/// only be reconfigured by giving the registers back with [`release`].
///
/// [`release`]: PolledTwi::release
pub struct PolledTwi<R> {
    regs: R,
    poll_limit: PollLimit,
}

impl<R: TwiRegisters> PolledTwi<R> {
    /// Configure the baud divisor, force the bus idle and enable the master
    pub fn new(mut regs: R, config: TwiConfig) -> Self {
        let (baud, fast_plus) = baud_setting(config.speed);
        if fast_plus {
            regs.write(Reg::Ctrla, bits::FMPEN);
        }
        regs.write(Reg::Mbaud, baud);

        // Bus state must be forced to idle before the master is enabled,
        // otherwise it sits in UNKNOWN until a stop is seen on the wire
        regs.write(Reg::Mstatus, bits::BUSSTATE_IDLE);
        regs.write(Reg::Mctrla, bits::ENABLE);

        Self {
            regs,
            poll_limit: config.poll_limit,
        }
    }

    /// Hand the register block back
    pub fn release(self) -> R {
        self.regs
    }

    /// Spin until any bit of `mask` is set in MSTATUS
    fn wait_for(&mut self, mask: u8) -> Result<u8, BusError> {
        let mut spent = 0u32;
        loop {
            let status = self.regs.read(Reg::Mstatus);
            if status & mask != 0 {
                return Ok(status);
            }
            spent = spent.saturating_add(1);
            if self.poll_limit.exhausted(spent) {
                #[cfg(feature = "defmt")]
                defmt::warn!("twi: flag {=u8:#x} not set after {} polls", mask, spent);
                return Err(BusError::Timeout);
            }
            core::hint::spin_loop();
        }
    }

    /// RXACK clear means the slave pulled SDA low
    fn acknowledged(status: u8) -> Result<(), BusError> {
        if status & bits::RXACK == 0 {
            Ok(())
        } else {
            Err(BusError::NotAcknowledged)
        }
    }

    fn run_operations(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), BusError> {
        let mut direction = None;

        for i in 0..operations.len() {
            let next_is_read = matches!(operations.get(i + 1), Some(Operation::Read(_)));

            match &mut operations[i] {
                Operation::Write(bytes) => {
                    if direction != Some(Direction::Write) {
                        self.start(address, Direction::Write)?;
                        direction = Some(Direction::Write);
                    }
                    for &byte in bytes.iter() {
                        self.write_byte(byte)?;
                    }
                }
                Operation::Read(buf) => {
                    if direction != Some(Direction::Read) {
                        self.start(address, Direction::Read)?;
                        direction = Some(Direction::Read);
                    }
                    let len = buf.len();
                    for (j, slot) in buf.iter_mut().enumerate() {
                        *slot = self.read_byte(j + 1 == len && !next_is_read)?;
                    }
                }
            }
        }

        Ok(())
    }
}

impl<R: TwiRegisters> TwiMaster for PolledTwi<R> {
    fn start(&mut self, address: u8, direction: Direction) -> Result<(), BusError> {
        self.regs
            .write(Reg::Maddr, (address << 1) | direction.bit());

        let status = self.wait_for(bits::WIF | bits::RIF)?;
        if status & (bits::ARBLOST | bits::BUSERR) != 0 {
            #[cfg(feature = "defmt")]
            defmt::debug!("twi: arbitration lost addressing {=u8:#x}", address);
            return Err(BusError::ArbitrationLost);
        }
        Self::acknowledged(status)
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), BusError> {
        self.regs.write(Reg::Mdata, byte);
        self.regs.write(Reg::Mctrlb, bits::MCMD_RECVTRANS);

        let status = self.wait_for(bits::WIF)?;
        Self::acknowledged(status)
    }

    fn read_byte(&mut self, last: bool) -> Result<u8, BusError> {
        self.wait_for(bits::RIF)?;
        let data = self.regs.read(Reg::Mdata);

        if last {
            self.regs
                .write(Reg::Mctrlb, bits::ACKACT | bits::MCMD_RECVTRANS);
        } else {
            self.regs.write(Reg::Mctrlb, bits::MCMD_RECVTRANS);
        }

        Ok(data)
    }

    fn stop(&mut self) {
        self.regs.write(Reg::Mctrlb, bits::ACKACT | bits::MCMD_STOP);
    }
}

impl<R: TwiRegisters> ErrorType for PolledTwi<R> {
    type Error = BusError;
}

impl<R: TwiRegisters> I2c for PolledTwi<R> {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if operations.is_empty() {
            return Ok(());
        }

        let result = self.run_operations(address, operations);
        // After losing arbitration the bus belongs to someone else
        if result != Err(BusError::ArbitrationLost) {
            self.stop();
        }
        result
    }
}
