//! Device-control requests and the channel they are issued on.
//!
//! Each request maps to one uinput ioctl (or, for `SetDescriptor`, a
//! descriptor write followed by `UI_DEV_CREATE`). Keeping them as a closed
//! enum lets tests swap the kernel for a recording double.

use crate::descriptor::DeviceDescriptor;
use crate::event::{AbsAxis, Button, EventType, RelAxis};
use std::fmt;
use std::io;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlRequest {
    /// `UI_SET_EVBIT`
    EnableEventType(EventType),
    /// `UI_SET_KEYBIT`
    RegisterKey(Button),
    /// `UI_SET_RELBIT`
    RegisterRelAxis(RelAxis),
    /// `UI_SET_ABSBIT`
    RegisterAbsAxis(AbsAxis),
    /// Descriptor write + `UI_DEV_CREATE`
    SetDescriptor(DeviceDescriptor),
    /// `UI_DEV_DESTROY`
    Destroy,
}
impl fmt::Display for ControlRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlRequest::EnableEventType(ty) => write!(f, "enable {} events", ty),
            ControlRequest::RegisterKey(button) => write!(f, "register {}", button),
            ControlRequest::RegisterRelAxis(axis) => write!(f, "register relative {:?} axis", axis),
            ControlRequest::RegisterAbsAxis(axis) => write!(f, "register absolute {:?} axis", axis),
            ControlRequest::SetDescriptor(_) => f.write_str("create device"),
            ControlRequest::Destroy => f.write_str("destroy device"),
        }
    }
}

/// An open handle to a virtual input control node.
///
/// Implementations are not required to be thread safe beyond `Send`; a
/// channel is owned by exactly one device handle.
#[cfg_attr(test, mockall::automock)]
pub trait ControlChannel: Send {
    /// Issues one control request.
    fn control(&mut self, request: ControlRequest) -> io::Result<()>;

    /// Writes one encoded event record in a single call.
    fn write(&mut self, record: &[u8]) -> io::Result<()>;

    /// Releases the underlying resource. Called at most once.
    fn close(&mut self) -> io::Result<()>;
}
