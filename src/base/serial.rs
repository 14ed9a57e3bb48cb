use crate::base::error::{Error, Result};
use crate::base::traits::Transport;
use log::info;
use serialport::{ClearBuffer, SerialPort};
use std::io;
use std::time::Duration;

const SERIAL_READ_TIMEOUT: Duration = Duration::from_millis(10);

impl Transport for Box<dyn SerialPort> {
    /// Opens the port, raises DTR and throws away anything received before the session.
    fn open(identifier: &str, baud_rate: u32) -> Result<Self> {
        let connect_error = |e: serialport::Error| Error::ConnectionFailed {
            identifier: identifier.to_owned(),
            description: e.to_string(),
        };

        let mut port = serialport::new(identifier, baud_rate)
            .timeout(SERIAL_READ_TIMEOUT)
            .open()
            .map_err(connect_error)?;
        port.write_data_terminal_ready(true).map_err(connect_error)?;
        port.clear(ClearBuffer::Input).map_err(connect_error)?;

        info!("Opened {} at {} baud", identifier, baud_rate);
        Ok(port)
    }

    fn bytes_available(&mut self) -> Result<usize> {
        let ready = self.bytes_to_read().map_err(io::Error::from)?;
        Ok(ready as usize)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        io::Read::read_exact(self, buf)?;
        Ok(())
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        io::Write::write_all(self, bytes)?;
        io::Write::flush(self)?;
        Ok(())
    }
}
