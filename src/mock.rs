//! In-memory control channel for tests.
//!
//! [`RecordingChannel`] behaves like a strict uinput node: codes can only be
//! registered after their event type, registrations are refused once the
//! device exists, and only registered events may be written. Every accepted
//! call is appended to a log that a [`ChannelLog`] can inspect after the
//! channel has been moved into a device handle.
//!
//! ```ignore
//! let (channel, log) = RecordingChannel::new();
//! let mut mouse = Mouse::with_channel(Box::new(channel), b"test")?;
//! mouse.left_click()?;
//! assert_eq!(log.events().len(), 4);
//! ```

use crate::codec::{InputEvent, decode};
use crate::control::{ControlChannel, ControlRequest};
use crate::event::{Button, EV_ABS, EV_KEY, EV_REL, EventType};
use std::collections::HashSet;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

/// One accepted call on the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Control(ControlRequest),
    Write(InputEvent),
    Close,
}

type RequestFilter = Box<dyn Fn(&ControlRequest) -> bool + Send>;

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    raw_writes: Vec<Vec<u8>>,
    event_types: HashSet<EventType>,
    codes: HashSet<(u16, u16)>,
    created: bool,
    closed: bool,
    close_count: usize,
    write_attempts: usize,
    fail_request: Option<RequestFilter>,
    fail_write_at: Option<usize>,
}

fn rejected(message: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, message.to_string())
}

#[derive(Default)]
pub struct RecordingChannel {
    state: Arc<Mutex<State>>,
}
impl RecordingChannel {
    pub fn new() -> (Self, ChannelLog) {
        let channel = Self::default();
        let log = ChannelLog {
            state: Arc::clone(&channel.state),
        };
        (channel, log)
    }

    /// Fails every control request matching `filter` with `EINVAL`.
    pub fn fail_request(self, filter: impl Fn(&ControlRequest) -> bool + Send + 'static) -> Self {
        self.lock().fail_request = Some(Box::new(filter));
        self
    }

    /// Fails the write attempt with this zero-based index with `EIO`.
    pub fn fail_write_at(self, index: usize) -> Self {
        self.lock().fail_write_at = Some(index);
        self
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }
}
impl ControlChannel for RecordingChannel {
    fn control(&mut self, request: ControlRequest) -> io::Result<()> {
        let mut state = self.lock();
        if state.closed {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "channel closed"));
        }
        if state.fail_request.as_ref().is_some_and(|f| f(&request)) {
            return Err(io::Error::from_raw_os_error(libc::EINVAL));
        }

        let needs = |ty: EventType, state: &State| -> io::Result<()> {
            if state.created {
                return Err(rejected("device already created"));
            }
            if !state.event_types.contains(&ty) {
                return Err(rejected("event type not enabled"));
            }
            Ok(())
        };

        match &request {
            ControlRequest::EnableEventType(ty) => {
                if state.created {
                    return Err(rejected("device already created"));
                }
                state.event_types.insert(*ty);
            }
            ControlRequest::RegisterKey(button) => {
                needs(EventType::Key, &*state)?;
                state.codes.insert((EV_KEY, button.to_code()));
            }
            ControlRequest::RegisterRelAxis(axis) => {
                needs(EventType::Rel, &*state)?;
                state.codes.insert((EV_REL, axis.to_code()));
            }
            ControlRequest::RegisterAbsAxis(axis) => {
                needs(EventType::Abs, &*state)?;
                state.codes.insert((EV_ABS, axis.to_code()));
            }
            ControlRequest::SetDescriptor(_) => {
                if state.created {
                    return Err(rejected("device already created"));
                }
                state.created = true;
            }
            ControlRequest::Destroy => {
                if !state.created {
                    return Err(rejected("device not created"));
                }
                state.created = false;
            }
        }

        state.calls.push(Call::Control(request));
        Ok(())
    }

    fn write(&mut self, record: &[u8]) -> io::Result<()> {
        let mut state = self.lock();
        if state.closed {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "channel closed"));
        }

        let attempt = state.write_attempts;
        state.write_attempts += 1;
        if state.fail_write_at == Some(attempt) {
            return Err(io::Error::from_raw_os_error(libc::EIO));
        }

        if !state.created {
            return Err(rejected("device not created"));
        }
        let event = decode(record).map_err(|e| rejected(&e.to_string()))?;
        if !event.is_sync() && !state.codes.contains(&(event.event_type, event.code)) {
            return Err(rejected("event code not registered"));
        }

        state.raw_writes.push(record.to_vec());
        state.calls.push(Call::Write(event));
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        let mut state = self.lock();
        state.close_count += 1;
        if state.closed {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "channel already closed"));
        }
        state.closed = true;
        state.calls.push(Call::Close);
        Ok(())
    }
}

/// Read side of a [`RecordingChannel`].
#[derive(Clone)]
pub struct ChannelLog {
    state: Arc<Mutex<State>>,
}
impl ChannelLog {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn requests(&self) -> Vec<ControlRequest> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Control(request) => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn events(&self) -> Vec<InputEvent> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Write(event) => Some(*event),
                _ => None,
            })
            .collect()
    }

    /// Byte buffers exactly as passed to `write`.
    pub fn raw_writes(&self) -> Vec<Vec<u8>> {
        self.lock().raw_writes.clone()
    }

    pub fn write_attempts(&self) -> usize {
        self.lock().write_attempts
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Number of times `close` was called, including rejected repeats.
    pub fn close_count(&self) -> usize {
        self.lock().close_count
    }

    pub fn is_registered(&self, button: Button) -> bool {
        self.lock().codes.contains(&(EV_KEY, button.to_code()))
    }
}
