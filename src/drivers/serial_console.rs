use embedded_hal::serial::Write;
use ufmt::uWrite;

/// Text console on a serial transmitter, the usual sink for status reports
pub struct SerialConsole<TX> {
    tx: TX,
}

impl<TX: Write<u8>> SerialConsole<TX> {
    pub fn new(tx: TX) -> Self {
        Self { tx }
    }

    pub fn write_byte(&mut self, byte: u8) -> Result<(), TX::Error> {
        nb::block!(self.tx.write(byte))
    }

    pub fn write_str(&mut self, s: &str) -> Result<(), TX::Error> {
        for byte in s.bytes() {
            self.write_byte(byte)?;
        }
        Ok(())
    }

    pub fn write_line(&mut self, s: &str) -> Result<(), TX::Error> {
        self.write_str(s)?;
        self.write_str("\r\n")
    }

    pub fn flush(&mut self) -> Result<(), TX::Error> {
        nb::block!(self.tx.flush())
    }

    /// Give the transmitter back
    pub fn release(self) -> TX {
        self.tx
    }
}

impl<TX: Write<u8>> uWrite for SerialConsole<TX> {
    type Error = TX::Error;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        SerialConsole::write_str(self, s)
    }
}
