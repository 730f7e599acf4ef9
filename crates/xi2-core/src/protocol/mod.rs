//! Protocol module containing the XI2 event decoder and the subscription mask.

pub mod codec;
pub mod mask;

pub use codec::{decode_event, encode_hierarchy_event, DecodeError, XiEvent};
pub use mask::EventMask;
