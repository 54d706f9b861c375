//! SPI interface implementation built on top of `embedded-hal` `SpiDevice`.

use embedded_hal::spi::{Operation, SpiDevice};

use super::Max31865Interface;

/// SPI-based interface implementation for the MAX31865 driver.
///
/// Chip-select identity lives inside the wrapped [`SpiDevice`]; one interface
/// value corresponds to one chip, and bus sharing is the HAL's concern.
pub struct SpiInterface<SPI> {
    spi: SPI,
}

impl<SPI> SpiInterface<SPI> {
    /// Creates a new interface from the provided SPI device abstraction.
    pub const fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Builds the command byte used to address registers over SPI.
    ///
    /// Each register has a read address with bit 7 clear and a write address
    /// with bit 7 set.
    fn command_byte(register: u8, is_read: bool) -> u8 {
        if is_read {
            register & 0x7F
        } else {
            register | 0x80
        }
    }

    /// Provides mutable access to the wrapped SPI device.
    pub fn spi_mut(&mut self) -> &mut SPI {
        &mut self.spi
    }

    /// Consumes the interface and returns the owned SPI device.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> Max31865Interface for SpiInterface<SPI>
where
    SPI: SpiDevice,
{
    type Error = SPI::Error;

    fn write_register(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error> {
        let frame = [Self::command_byte(register, false), value];
        self.spi.write(&frame)
    }

    fn read_register(&mut self, register: u8) -> core::result::Result<u8, Self::Error> {
        let mut value = [0u8; 1];
        self.read_many(register, &mut value)?;
        Ok(value[0])
    }

    fn read_many(&mut self, register: u8, buf: &mut [u8]) -> core::result::Result<(), Self::Error> {
        if buf.is_empty() {
            return Ok(());
        }

        let command = [Self::command_byte(register, true)];
        let mut operations = [Operation::Write(&command), Operation::Read(buf)];
        self.spi.transaction(&mut operations)
    }
}

#[cfg(test)]
mod tests {
    use super::SpiInterface;
    use crate::interface::Max31865Interface;
    use core::convert::Infallible;
    use embedded_hal::spi::{ErrorType, Operation, SpiDevice};

    struct MockDevice<'a> {
        expectations: &'a [TransactionExpectation<'a>],
        index: usize,
    }

    impl<'a> MockDevice<'a> {
        fn new(expectations: &'a [TransactionExpectation<'a>]) -> Self {
            Self { expectations, index: 0 }
        }
    }

    impl<'a> Drop for MockDevice<'a> {
        fn drop(&mut self) {
            assert_eq!(
                self.index,
                self.expectations.len(),
                "not all SPI expectations consumed"
            );
        }
    }

    impl<'a> ErrorType for MockDevice<'a> {
        type Error = Infallible;
    }

    impl<'a> SpiDevice for MockDevice<'a> {
        fn transaction<'b>(
            &mut self,
            operations: &mut [Operation<'b, u8>],
        ) -> Result<(), Self::Error> {
            let expected = self
                .expectations
                .get(self.index)
                .expect("unexpected SPI transaction");
            self.index += 1;

            match *expected {
                TransactionExpectation::Read { command, response } => {
                    assert_eq!(operations.len(), 2, "expected write+read operations");
                    let (first, rest) = operations.split_first_mut().expect("missing first op");
                    match first {
                        Operation::Write(data) => {
                            assert_eq!(data.len(), 1, "command length mismatch");
                            assert_eq!(data[0], command, "command byte mismatch");
                        }
                        _ => panic!("first operation must be write"),
                    }

                    let second = rest.first_mut().expect("missing second op");
                    match second {
                        Operation::Read(buf) => {
                            assert_eq!(buf.len(), response.len(), "response length mismatch");
                            buf.copy_from_slice(response);
                        }
                        _ => panic!("second operation must be read"),
                    }
                }
                TransactionExpectation::Write { frame } => {
                    assert_eq!(operations.len(), 1, "expected a single write operation");
                    match operations.first().expect("missing operation") {
                        Operation::Write(data) => {
                            assert_eq!(*data, frame, "frame mismatch");
                        }
                        _ => panic!("operation must be write"),
                    }
                }
            }

            Ok(())
        }
    }

    #[derive(Clone, Copy)]
    enum TransactionExpectation<'a> {
        Read { command: u8, response: &'a [u8] },
        Write { frame: &'a [u8] },
    }

    #[test]
    fn read_many_transfers_command_and_fills_buffer() {
        let expectations = [TransactionExpectation::Read {
            command: 0x01,
            response: &[0x9C, 0x40],
        }];
        let mock = MockDevice::new(&expectations);
        let mut interface = SpiInterface::new(mock);

        let mut buffer = [0u8; 2];
        interface.read_many(0x01, &mut buffer).unwrap();
        assert_eq!(buffer, [0x9C, 0x40]);
    }

    #[test]
    fn write_register_sets_the_write_address_bit() {
        let expectations = [TransactionExpectation::Write {
            frame: &[0x80, 0xD1],
        }];
        let mock = MockDevice::new(&expectations);
        let mut interface = SpiInterface::new(mock);

        interface.write_register(0x00, 0xD1).unwrap();
    }

    #[test]
    fn read_register_reuses_read_many() {
        let expectations = [TransactionExpectation::Read {
            command: 0x07,
            response: &[0x44],
        }];
        let mock = MockDevice::new(&expectations);
        let mut interface = SpiInterface::new(mock);

        let value = interface.read_register(0x07).unwrap();
        assert_eq!(value, 0x44);
    }

    #[test]
    fn read_addresses_keep_the_top_bit_clear() {
        let expectations = [TransactionExpectation::Read {
            command: 0x02,
            response: &[0x00],
        }];
        let mock = MockDevice::new(&expectations);
        let mut interface = SpiInterface::new(mock);

        interface.read_register(0x82).unwrap();
    }

    #[test]
    fn read_many_ignores_empty_buffer() {
        let expectations: [TransactionExpectation; 0] = [];
        let mock = MockDevice::new(&expectations);
        let mut interface = SpiInterface::new(mock);

        interface.read_many(0x01, &mut []).unwrap();
    }
}
