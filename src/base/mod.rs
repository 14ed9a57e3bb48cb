mod channel;
mod error;
mod frame_buffer;
mod message;
#[cfg(feature = "serial")]
mod serial;
mod traits;

pub use self::channel::*;
pub use self::error::{Error, Result};
pub use self::frame_buffer::FrameBuffer;
pub use self::message::Message;
pub use self::traits::{ProtocolDecoder, ProtocolEncoder, Transport};
