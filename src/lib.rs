//! # SF45 Driver
//!
//! `sf45` is a driver for LightWare SF45 series scanning LiDAR sensors.
//! It reassembles frames from the serial byte stream however the link happens
//! to fragment it, checks their CRC, decodes distance samples and encodes the
//! parameter writes used to configure a scanning session.
//!
//! ```ignore
//! use sf45::{SessionConfig, Sf45Device, SF45_DEFAULT_BAUD_RATE};
//!
//! let mut lidar = Sf45Device::<Box<dyn serialport::SerialPort>>::new();
//! lidar.connect("/dev/ttyACM0", SF45_DEFAULT_BAUD_RATE)?;
//! lidar.configure(&SessionConfig::default())?;
//!
//! loop {
//!     lidar.poll()?;
//!     for sample in lidar.drain_distance_results() {
//!         println!("{:.2} m at {:.1} deg", sample.first_distance, sample.angle);
//!     }
//! }
//! ```

extern crate byteorder;
extern crate log;

mod answers;
pub mod base;
pub mod checksum;
pub mod cmds;
mod internals;
pub mod parsers;
mod protocol;
pub mod types;

pub use crate::answers::Sf45ResponseDistanceData;
pub use crate::base::{Channel, Error, Message, Result, Transport};
pub use crate::internals::{DEFAULT_INT16_FRAMING, SF45_DEFAULT_BAUD_RATE};
pub use crate::protocol::{
    encode_frame, DecodeStats, Sf45HostProtocol, SF45_FRAME_START, SF45_MAX_FRAME_SIZE,
    SF45_MAX_PAYLOAD_LEN,
};
pub use crate::types::{Answer, DistanceSample, Int16Framing, Position, SessionConfig};

use crate::cmds::*;
use crate::internals::SF45_DEFAULT_QUEUE_DEPTH;
use crate::parsers::parse_answer;
use log::{error, info, trace, warn};
use std::mem;

/// Represents a connection to and control interface for an SF45 device.
///
/// The device never blocks: `poll()` consumes whatever the transport has
/// received so far, and `drain_distance_results()` hands over the samples
/// collected since the previous drain.
#[derive(Debug)]
pub struct Sf45Device<T> {
    channel: Option<Channel<Sf45HostProtocol, T>>,
    pending: Vec<DistanceSample>,
    product_name: Option<String>,
    int16_framing: Int16Framing,
}

impl<T> Sf45Device<T>
where
    T: Transport,
{
    /// Creates a device with no transport attached. Call `connect()` next.
    pub fn new() -> Sf45Device<T> {
        trace!("Creating new Sf45Device");
        Sf45Device {
            channel: None,
            pending: Vec::with_capacity(SF45_DEFAULT_QUEUE_DEPTH),
            product_name: None,
            int16_framing: DEFAULT_INT16_FRAMING,
        }
    }

    /// Creates a device on an already open transport.
    ///
    /// # Arguments
    ///
    /// * `transport` - The open link to the sensor.
    pub fn with_transport(transport: T) -> Sf45Device<T> {
        let mut device = Sf45Device::new();
        device.channel = Some(Channel::new(Sf45HostProtocol::new(), transport));
        device
    }

    /// Selects how 16-bit writes are framed (see `Int16Framing`).
    pub fn with_int16_framing(mut self, framing: Int16Framing) -> Sf45Device<T> {
        self.int16_framing = framing;
        self
    }

    /// Opens the transport named by `identifier`.
    ///
    /// A failure is logged and returned once; the device simply stays
    /// disconnected and every later send reports `Error::NotConnected`.
    ///
    /// # Arguments
    ///
    /// * `identifier` - Port name, e.g. `/dev/ttyACM0` or `COM6`.
    /// * `baud_rate` - Link speed, usually `SF45_DEFAULT_BAUD_RATE`.
    pub fn connect(&mut self, identifier: &str, baud_rate: u32) -> Result<()> {
        info!("Device connecting to {} at {} baud", identifier, baud_rate);
        match T::open(identifier, baud_rate) {
            Ok(transport) => {
                self.channel = Some(Channel::new(Sf45HostProtocol::new(), transport));
                info!("Device connected");
                Ok(())
            }
            Err(e) => {
                error!("Device connect failed: {}", e);
                self.channel = None;
                Err(e)
            }
        }
    }

    /// Returns `true` if a transport is attached.
    pub fn is_connected(&self) -> bool {
        self.channel.is_some()
    }

    /// Drops the transport. Samples not yet drained are kept.
    pub fn disconnect(&mut self) {
        if self.channel.take().is_some() {
            info!("Device disconnected");
        }
    }

    /// Product name reported by the device, once it has answered `send_get_product()`.
    pub fn product_name(&self) -> Option<&str> {
        self.product_name.as_deref()
    }

    /// Decoder counters of the current connection.
    pub fn stats(&self) -> DecodeStats {
        self.channel
            .as_ref()
            .map(|c| c.protocol().stats())
            .unwrap_or_default()
    }

    fn send(&mut self, msg: &Message) -> Result<usize> {
        match self.channel.as_mut() {
            Some(channel) => channel.write(msg),
            None => {
                warn!("Dropping opcode {} write, device not connected", msg.opcode);
                Err(Error::NotConnected)
            }
        }
    }

    /// Requests the product name. The answer is picked up by `poll()`.
    pub fn send_get_product(&mut self) -> Result<usize> {
        trace!("Requesting product name");
        self.send(&get(SF45_CMD_PRODUCT_NAME))
    }

    /// Writes a one byte parameter.
    pub fn send_write_int8(&mut self, opcode: u8, value: u8) -> Result<usize> {
        trace!("Writing int8 {} to opcode {}", value, opcode);
        self.send(&write_u8(opcode, value))
    }

    /// Writes a two byte parameter using the configured `Int16Framing`.
    pub fn send_write_int16(&mut self, opcode: u8, value: i16) -> Result<usize> {
        trace!(
            "Writing int16 {} to opcode {} ({:?})",
            value,
            opcode,
            self.int16_framing
        );
        let msg = write_i16(opcode, value, self.int16_framing);
        self.send(&msg)
    }

    /// Writes a four byte integer parameter.
    pub fn send_write_int32(&mut self, opcode: u8, value: i32) -> Result<usize> {
        trace!("Writing int32 {} to opcode {}", value, opcode);
        self.send(&write_i32(opcode, value))
    }

    /// Writes a four byte float parameter.
    pub fn send_write_float(&mut self, opcode: u8, value: f32) -> Result<usize> {
        trace!("Writing float {} to opcode {}", value, opcode);
        self.send(&write_f32(opcode, value))
    }

    /// Starts sweeping.
    pub fn send_scan_enable(&mut self) -> Result<usize> {
        self.send(&scan_enable(true))
    }

    /// Stops sweeping.
    pub fn send_scan_disable(&mut self) -> Result<usize> {
        self.send(&scan_enable(false))
    }

    /// Points the head at `degrees` (takes effect while sweeping is off).
    pub fn send_write_position(&mut self, degrees: f32) -> Result<usize> {
        self.send(&scan_position(degrees))
    }

    /// Stops all streaming output.
    pub fn disable_streaming(&mut self) -> Result<usize> {
        self.send(&stream(SF45_STREAM_NONE))
    }

    /// Streams a distance answer for every sample.
    pub fn enable_distance_streaming(&mut self) -> Result<usize> {
        self.send(&stream(SF45_STREAM_DISTANCE_DATA_CM))
    }

    /// Sets the lower sweep limit in degrees.
    pub fn set_low_angle_limit(&mut self, degrees: f32) -> Result<usize> {
        self.send_write_float(SF45_CMD_SCAN_LOW_ANGLE, degrees)
    }

    /// Sets the upper sweep limit in degrees.
    pub fn set_high_angle_limit(&mut self, degrees: f32) -> Result<usize> {
        self.send_write_float(SF45_CMD_SCAN_HIGH_ANGLE, degrees)
    }

    /// Sets the update rate code.
    pub fn set_update_rate(&mut self, rate: u8) -> Result<usize> {
        self.send_write_int8(SF45_CMD_UPDATE_RATE, rate)
    }

    /// Sets the sweep cycle speed.
    pub fn set_cycle_speed(&mut self, speed: i16) -> Result<usize> {
        self.send_write_int16(SF45_CMD_SCAN_SPEED, speed)
    }

    /// Selects which fields each distance answer carries.
    pub fn set_distance_output(&mut self, bitmask: i32) -> Result<usize> {
        self.send_write_int32(SF45_CMD_DISTANCE_OUTPUT, bitmask)
    }

    /// Sends the whole start-up sequence for `config`.
    ///
    /// Stops at the first failed write. Returns the number of bytes written.
    pub fn configure(&mut self, config: &SessionConfig) -> Result<usize> {
        info!("Configuring session: {:?}", config);
        let mut written = 0;
        for msg in session_start(config, self.int16_framing).iter() {
            written += self.send(msg)?;
        }
        Ok(written)
    }

    /// Decodes everything the transport has received since the last call.
    ///
    /// Returns the number of valid frames decoded. Corrupt frames and
    /// malformed answers are logged and skipped; only transport errors are
    /// returned, and frames decoded before such an error are still queued.
    /// Does nothing while disconnected.
    pub fn poll(&mut self) -> Result<usize> {
        let mut messages = Vec::new();
        let polled = match self.channel.as_mut() {
            Some(channel) => channel.poll(&mut messages),
            None => {
                trace!("poll called while disconnected");
                return Ok(0);
            }
        };

        for msg in messages.iter() {
            match parse_answer(msg) {
                Ok(Answer::ProductName(name)) => {
                    info!("Product name: {}", name);
                    self.product_name = Some(name);
                }
                Ok(Answer::Distance(sample)) => self.pending.push(sample),
                Ok(Answer::Unknown { opcode, data_len }) => {
                    trace!("Ignoring opcode {} with {} data bytes", opcode, data_len)
                }
                Err(e) => warn!("Dropping answer for opcode {}: {}", msg.opcode, e),
            }
        }

        if let Err(e) = polled {
            error!(
                "Transport failed after {} frames were decoded: {}",
                messages.len(),
                e
            );
            return Err(e);
        }
        Ok(messages.len())
    }

    /// Takes every sample decoded since the previous drain, oldest first.
    pub fn drain_distance_results(&mut self) -> Vec<DistanceSample> {
        mem::replace(
            &mut self.pending,
            Vec::with_capacity(SF45_DEFAULT_QUEUE_DEPTH),
        )
    }
}

impl<T: Transport> Default for Sf45Device<T> {
    fn default() -> Self {
        Self::new()
    }
}
