/*
 * Filename: transport.rs
 * Description: the bus capability a RegisterBus talks through.
 */

use core::fmt::Debug;

use embedded_hal::i2c::{
    self,
    Error as _,
    ErrorKind,
    NoAcknowledgeSource,
    SevenBitAddress,
};


/// Coarse classification of a transport error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    AddressNotAcknowledged,
    Timeout,
    Other,
}


/// Byte level access to a two-wire bus.
///
/// Every `embedded_hal::i2c::I2c` implementation (and `&mut` to one) is a
/// `BusTransport`. Implement it directly for transports that can report
/// partial reads or timeouts.
pub trait BusTransport {
    type Error: Debug;

    /// Sends `bytes` to `address` as one framed write (start, bytes, stop).
    /// An error means the device did not accept the transaction.
    fn transmit(&mut self, address: SevenBitAddress, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Reads up to `buffer.len()` bytes from `address` in one transaction.
    /// Returns the number of bytes that actually arrived.
    fn request(&mut self, address: SevenBitAddress, buffer: &mut [u8]) -> Result<usize, Self::Error>;

    fn fault(_error: &Self::Error) -> Fault {
        Fault::Other
    }
}


impl<I2C> BusTransport for I2C
where I2C: i2c::I2c
{
    type Error = I2C::Error;

    fn transmit(&mut self, address: SevenBitAddress, bytes: &[u8]) -> Result<(), Self::Error> {
        self.write(address, bytes)
    }

    //embedded-hal reads either fill the whole buffer or fail.
    fn request(&mut self, address: SevenBitAddress, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        self.read(address, buffer)?;
        Ok(buffer.len())
    }

    fn fault(error: &Self::Error) -> Fault {
        match error.kind() {
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address) => Fault::AddressNotAcknowledged,
            _ => Fault::Other,
        }
    }
}


#[cfg(test)]
mod transport_tests {
    use embedded_hal_mock::eh1::i2c::{
        Mock as I2cMock,
        Transaction as I2cTransaction,
    };

    use super::*;

    const ADDR: u8 = 0x20;

    #[test]
    fn i2c_is_transport() {
        let expectations = [
            I2cTransaction::write(ADDR, vec![0x01, 0x02]),
            I2cTransaction::read(ADDR, vec![0xAA, 0xBB]),
        ];
        let mut i2c = I2cMock::new(&expectations);

        let mut buf = [0u8; 2];
        {
            let transport = &mut i2c;
            transport.transmit(ADDR, &[0x01, 0x02]).unwrap();
            let n = transport.request(ADDR, &mut buf).unwrap();
            assert_eq!(n, 2);
        }
        assert_eq!(buf, [0xAA, 0xBB]);

        i2c.done();
    }

    #[test]
    fn classify_faults() {
        let addr_nack = ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address);
        let data_nack = ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data);

        assert_eq!(<I2cMock as BusTransport>::fault(&addr_nack), Fault::AddressNotAcknowledged);
        assert_eq!(<I2cMock as BusTransport>::fault(&data_nack), Fault::Other);
        assert_eq!(<I2cMock as BusTransport>::fault(&ErrorKind::Bus), Fault::Other);
        assert_eq!(<I2cMock as BusTransport>::fault(&ErrorKind::ArbitrationLoss), Fault::Other);
    }
}
