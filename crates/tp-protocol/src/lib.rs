//! tp-protocol: Tracker control-plane wire protocol
//!
//! This crate defines the binary packet format spoken between the pool and
//! the tracker. Only the control exchanges the pool needs are modelled here:
//! the liveness probe (`ACTIVE_TEST`) and the polite disconnect (`QUIT`).

pub mod codec;
pub mod command;
pub mod error;
pub mod frame;

pub use codec::{Packet, PacketCodec};
pub use command::{Command, Status};
pub use error::ProtocolError;
pub use frame::{PacketHeader, HEADER_SIZE, MAX_BODY_SIZE};
