//! Binary encoding of `struct input_event`.
//!
//! Layout, in host byte order:
//!
//! ```text
//! tv_sec   c_long
//! tv_usec  c_long
//! type     u16
//! code     u16
//! value    i32
//! ```
//!
//! The width of the timestamp fields follows the target's `c_long`, so the
//! record is 24 bytes on 64-bit Linux and 16 bytes on 32-bit Linux.

use crate::event::{AbsAxis, Button, ButtonState, EV_ABS, EV_KEY, EV_REL, EV_SYN, RelAxis, SYN_REPORT};
use libc::c_long;
use std::mem::size_of;
use thiserror::Error;

const LONG_SIZE: usize = size_of::<c_long>();

/// Size in bytes of one encoded event record.
pub const EVENT_SIZE: usize = 2 * LONG_SIZE + 2 + 2 + 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("event record must be {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeVal {
    pub tv_sec: c_long,
    pub tv_usec: c_long,
}

/// One input event record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub time: TimeVal,
    pub event_type: u16,
    pub code: u16,
    pub value: i32,
}
impl InputEvent {
    /// Event with a zero timestamp. The kernel stamps injected events itself.
    pub fn new(event_type: u16, code: u16, value: i32) -> Self {
        Self {
            time: TimeVal::default(),
            event_type,
            code,
            value,
        }
    }

    pub fn button(button: Button, state: ButtonState) -> Self {
        Self::new(EV_KEY, button.to_code(), state as i32)
    }

    pub fn relative(axis: RelAxis, delta: i32) -> Self {
        Self::new(EV_REL, axis.to_code(), delta)
    }

    pub fn absolute(axis: AbsAxis, position: i32) -> Self {
        Self::new(EV_ABS, axis.to_code(), position)
    }

    /// `SYN_REPORT` marker.
    pub fn sync() -> Self {
        Self::new(EV_SYN, SYN_REPORT, 0)
    }

    pub fn is_sync(&self) -> bool {
        self.event_type == EV_SYN && self.code == SYN_REPORT
    }

    pub fn to_bytes(&self) -> [u8; EVENT_SIZE] {
        encode(self)
    }
}

pub fn encode(event: &InputEvent) -> [u8; EVENT_SIZE] {
    let mut buf = [0u8; EVENT_SIZE];
    let mut offset = 0;
    let mut put = |bytes: &[u8]| {
        buf[offset..offset + bytes.len()].copy_from_slice(bytes);
        offset += bytes.len();
    };

    put(&event.time.tv_sec.to_ne_bytes());
    put(&event.time.tv_usec.to_ne_bytes());
    put(&event.event_type.to_ne_bytes());
    put(&event.code.to_ne_bytes());
    put(&event.value.to_ne_bytes());
    buf
}

pub fn decode(bytes: &[u8]) -> Result<InputEvent, CodecError> {
    if bytes.len() != EVENT_SIZE {
        return Err(CodecError::Length {
            expected: EVENT_SIZE,
            actual: bytes.len(),
        });
    }

    let (sec, rest) = bytes.split_at(LONG_SIZE);
    let (usec, rest) = rest.split_at(LONG_SIZE);
    let (event_type, rest) = rest.split_at(2);
    let (code, value) = rest.split_at(2);

    // Slice lengths are fixed by the split offsets above.
    let long = |b: &[u8]| c_long::from_ne_bytes(b.try_into().unwrap_or([0; LONG_SIZE]));

    Ok(InputEvent {
        time: TimeVal {
            tv_sec: long(sec),
            tv_usec: long(usec),
        },
        event_type: u16::from_ne_bytes([event_type[0], event_type[1]]),
        code: u16::from_ne_bytes([code[0], code[1]]),
        value: i32::from_ne_bytes([value[0], value[1], value[2], value[3]]),
    })
}

/// Splits a buffer holding several consecutive records.
pub fn decode_all(bytes: &[u8]) -> Result<Vec<InputEvent>, CodecError> {
    if bytes.len() % EVENT_SIZE != 0 {
        return Err(CodecError::Length {
            expected: (bytes.len() / EVENT_SIZE + 1) * EVENT_SIZE,
            actual: bytes.len(),
        });
    }
    bytes.chunks_exact(EVENT_SIZE).map(decode).collect()
}
