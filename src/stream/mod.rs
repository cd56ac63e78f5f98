pub mod message;
pub mod client;

pub use message::decode_message;
pub use client::{StreamClient, StreamHandle};
