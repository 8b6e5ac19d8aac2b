//! Wire protocol: message shape and the text frame codec
//!
//! Frames are deliberately human-readable ASCII so the link can be watched
//! on a logic analyzer or console during bring-up. There is no checksum and
//! no length prefix; framing relies on the pattern shape plus the
//! transport's own transaction boundary.

pub mod codec;
pub mod message;

pub use self::codec::FrameCodec;
pub use self::message::Message;
