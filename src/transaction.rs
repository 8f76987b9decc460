/*
 * Filename: transaction.rs
 * Description: single bus transactions. A register access is made of one or
 * two of these; nothing makes a pair of them atomic.
 */

use embedded_hal::i2c::SevenBitAddress;
use log::{debug, trace};

use crate::transport::{BusTransport, Fault};
use crate::Error;


/// Register pointer plus a 16-bit payload.
pub const MAX_WRITE_LEN: usize = 3;


/// Turns a transport error into the matching driver error.
pub(crate) fn transport_error<T>(address: SevenBitAddress, error: T::Error) -> Error<T::Error>
where T: BusTransport
{
    match T::fault(&error) {
        Fault::AddressNotAcknowledged => {
            debug!("device {:#04x} did not acknowledge its address", address);
            Error::AddressNotAcknowledged(error)
        }
        Fault::Timeout => {
            debug!("transaction with {:#04x} timed out", address);
            Error::TransportTimeout(error)
        }
        Fault::Other => {
            debug!("transaction with {:#04x} failed: {:?}", address, error);
            Error::Transport(error)
        }
    }
}


/// An open write transaction.
///
/// Bytes are queued by `send` and only reach the bus on `end`; dropping the
/// transaction without ending it transmits nothing.
#[must_use = "a write transaction does nothing until `end` is called"]
pub struct WriteTransaction<'a, T>
where T: BusTransport
{
    transport: &'a mut T,
    address: SevenBitAddress,
    buffer: [u8; MAX_WRITE_LEN],
    len: usize,
}

impl<'a, T> WriteTransaction<'a, T>
where T: BusTransport
{
    pub fn begin(transport: &'a mut T, address: SevenBitAddress) -> Self {
        WriteTransaction {
            transport,
            address,
            buffer: [0; MAX_WRITE_LEN],
            len: 0,
        }
    }

    pub fn send(mut self, byte: u8) -> Result<Self, Error<T::Error>> {
        if self.len == MAX_WRITE_LEN {
            return Err(Error::TransactionOverflow);
        }
        self.buffer[self.len] = byte;
        self.len += 1;
        Ok(self)
    }

    /// Bytes queued so far.
    pub fn queued(&self) -> &[u8] {
        &self.buffer[..self.len]
    }

    /// Closes the transaction, reporting whether the device accepted it.
    pub fn end(self) -> Result<(), Error<T::Error>> {
        trace!("write {:#04x}: {:02x?}", self.address, self.queued());

        let address = self.address;
        let bytes = &self.buffer[..self.len];
        self.transport
            .transmit(address, bytes)
            .map_err(|e| transport_error::<T>(address, e))
    }
}


/// The bytes returned by one read transaction, in bus-arrival order.
pub struct ReadRequest<const N: usize> {
    bytes: [u8; N],
    cursor: usize,
}

impl<const N: usize> ReadRequest<N> {
    /// Reads exactly `N` bytes from `address`.
    pub fn request<T>(transport: &mut T, address: SevenBitAddress) -> Result<Self, Error<T::Error>>
    where T: BusTransport
    {
        let mut bytes = [0u8; N];
        let received = transport
            .request(address, &mut bytes)
            .map_err(|e| transport_error::<T>(address, e))?;

        trace!("read {:#04x}: {:02x?}", address, &bytes[..received.min(N)]);

        if received < N {
            debug!("short read from {:#04x}: {} of {} bytes", address, received, N);
            return Err(Error::ShortRead { requested: N, received });
        }

        Ok(ReadRequest { bytes, cursor: 0 })
    }

    /// Next received byte, or `None` once all `N` have been taken.
    pub fn receive_byte(&mut self) -> Option<u8> {
        let byte = self.bytes.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(byte)
    }

    pub fn into_bytes(self) -> [u8; N] {
        self.bytes
    }
}
