#![cfg_attr(not(test), no_std)]
//! Register level access to devices on an I2C bus.
//!
//! Most I2C peripherals expose a byte addressed register file: write the
//! register pointer, then write or read data. `RegisterBus` wraps that
//! pattern for 8-bit registers, little-endian 16-bit register pairs and
//! single bits.

use core::fmt;

use embedded_hal::i2c::SevenBitAddress;
use log::trace;

pub mod bits;
pub use crate::bits::MAX_BIT_POSITION;

//The capability the bus is driven through.
pub mod transport;
pub use crate::transport::{BusTransport, Fault};

pub mod transaction;
pub use crate::transaction::{ReadRequest, WriteTransaction, MAX_WRITE_LEN};


//Impliment Error type for register access.
#[derive(Debug, PartialEq)]
pub enum Error<E> {
    /// The device did not acknowledge its address.
    AddressNotAcknowledged(E),
    /// The transport gave up waiting on the device.
    TransportTimeout(E),
    /// Any other bus fault reported by the transport.
    Transport(E),
    /// The device returned fewer bytes than were requested.
    ShortRead { requested: usize, received: usize },
    InvalidBitPosition(u8),
    InvalidBitValue(u8),
    /// No device address has been set.
    AddressNotSet,
    /// More bytes were queued than a write transaction holds.
    TransactionOverflow,
}

impl<E> fmt::Display for Error<E>
where E: fmt::Debug
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::AddressNotAcknowledged(e) => write!(f, "address not acknowledged: {:?}", e),
            Error::TransportTimeout(e) => write!(f, "transport timed out: {:?}", e),
            Error::Transport(e) => write!(f, "bus error: {:?}", e),
            Error::ShortRead { requested, received } => {
                write!(f, "short read: {} of {} bytes", received, requested)
            }
            Error::InvalidBitPosition(pos) => write!(f, "bit position {} is outside 0..=7", pos),
            Error::InvalidBitValue(bit) => write!(f, "bit value {} is neither 0 nor 1", bit),
            Error::AddressNotSet => write!(f, "device address not set"),
            Error::TransactionOverflow => {
                write!(f, "write transaction holds at most {} bytes", MAX_WRITE_LEN)
            }
        }
    }
}


/// Register access to one device on a bus.
///
/// The transport may be owned or borrowed: `&mut I2C` is a transport too, so
/// several `RegisterBus` values can take turns on one bus. Transactions are
/// not atomic across the pointer and data phases, so callers sharing a bus
/// must serialize whole operations themselves.
pub struct RegisterBus<T>
where T: BusTransport
{
    transport: T,
    address: Option<SevenBitAddress>,
}

impl<E, T> RegisterBus<T>
where T: BusTransport<Error = E>
{
    /// A bus with no device address. I/O fails with `Error::AddressNotSet`
    /// until `set_address` is called.
    pub fn new(transport: T) -> Self {
        RegisterBus { transport, address: None }
    }

    pub fn with_address(transport: T, address: SevenBitAddress) -> Self {
        RegisterBus { transport, address: Some(address) }
    }

    /// Sets the device every following transaction is addressed to.
    ///
    /// No bus traffic happens here and any value is accepted; reserved
    /// addresses are the caller's concern.
    pub fn set_address(&mut self, address: SevenBitAddress) {
        self.address = Some(address);
    }

    pub fn address(&self) -> Option<SevenBitAddress> {
        self.address
    }

    /// Gives the transport back.
    pub fn release(self) -> T {
        self.transport
    }

    fn device(&self) -> Result<SevenBitAddress, Error<E>> {
        self.address.ok_or(Error::AddressNotSet)
    }

    /// Writes `value` to `reg` in one transaction.
    pub fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Error<E>> {
        let address = self.device()?;
        trace!("{:#04x}: reg {:#04x} <- {:#04x}", address, reg, value);

        WriteTransaction::begin(&mut self.transport, address)
            .send(reg)?
            .send(value)?
            .end()
    }

    /// Writes `value` to `reg` and `reg + 1`, low byte first.
    ///
    /// # Precondition
    ///
    /// The device must auto-increment its register pointer after each byte
    /// of a transaction. This is not checked: on a device that does not, the
    /// high byte overwrites `reg` instead of landing in `reg + 1`.
    pub fn write_register_pair(&mut self, reg: u8, value: u16) -> Result<(), Error<E>> {
        let address = self.device()?;
        trace!("{:#04x}: reg {:#04x} <- {:#06x}", address, reg, value);

        let [low, high] = value.to_le_bytes();
        WriteTransaction::begin(&mut self.transport, address)
            .send(reg)?
            .send(low)?
            .send(high)?
            .end()
    }

    /// Points the device at `reg`. This is its own transaction; the data
    /// phase that follows is another.
    fn select(&mut self, address: SevenBitAddress, reg: u8) -> Result<(), Error<E>> {
        WriteTransaction::begin(&mut self.transport, address)
            .send(reg)?
            .end()
    }

    pub fn read_register(&mut self, reg: u8) -> Result<u8, Error<E>> {
        let address = self.device()?;
        self.select(address, reg)?;

        let [value] = ReadRequest::<1>::request(&mut self.transport, address)?.into_bytes();
        trace!("{:#04x}: reg {:#04x} -> {:#04x}", address, reg, value);
        Ok(value)
    }

    /// Reads `reg` and `reg + 1` as one little-endian value.
    ///
    /// # Precondition
    ///
    /// Same as `write_register_pair`: the device must auto-increment its
    /// register pointer within a read, otherwise both bytes come from `reg`.
    pub fn read_register_pair(&mut self, reg: u8) -> Result<u16, Error<E>> {
        let address = self.device()?;
        self.select(address, reg)?;

        let mut response = ReadRequest::<2>::request(&mut self.transport, address)?;
        let low = response.receive_byte().unwrap_or_default();
        let high = response.receive_byte().unwrap_or_default();

        let value = (u16::from(high) << 8) | u16::from(low);
        trace!("{:#04x}: reg {:#04x} -> {:#06x}", address, reg, value);
        Ok(value)
    }

    /// Sets (`bit == 1`) or clears (`bit == 0`) bit `pos` of `reg`, leaving
    /// the other seven bits as read.
    ///
    /// The register is always written back, even when the bit already held
    /// `bit`.
    pub fn write_bit(&mut self, reg: u8, pos: u8, bit: u8) -> Result<(), Error<E>> {
        check_position::<E>(pos)?;
        if bit > 1 {
            return Err(Error::InvalidBitValue(bit));
        }

        let current = self.read_register(reg)?;
        self.write_register(reg, bits::write(current, pos, bit))
    }

    /// Returns bit `pos` of `reg` as 0 or 1.
    pub fn read_bit(&mut self, reg: u8, pos: u8) -> Result<u8, Error<E>> {
        check_position::<E>(pos)?;

        let current = self.read_register(reg)?;
        Ok(bits::extract(current, pos))
    }
}

fn check_position<E>(pos: u8) -> Result<(), Error<E>> {
    if bits::is_valid_position(pos) {
        Ok(())
    } else {
        Err(Error::InvalidBitPosition(pos))
    }
}
