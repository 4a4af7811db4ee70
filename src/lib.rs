//! Vinput - virtual mouse and touchpad devices for Linux
//!
//! Creates input devices through the kernel's uinput facility and drives
//! them with high-level actions (move, click, press, release). Each action
//! is translated into `input_event` records followed by a sync marker.

pub mod codec;
pub mod control;
pub mod descriptor;
pub mod device;
pub mod error;
pub mod event;
pub mod mock;
pub mod mouse;
pub mod touchpad;
pub mod traits;
#[cfg(target_os = "linux")]
pub mod uinput;
pub mod validate;

// Re-export commonly used types
pub use codec::{EVENT_SIZE, InputEvent, TimeVal};
pub use control::{ControlChannel, ControlRequest};
pub use descriptor::{AxisBounds, DeviceDescriptor};
pub use device::{Action, Capabilities, DeviceHandle, DeviceState, SetupStage};
pub use error::{Error, Result};
pub use event::{AbsAxis, Button, ButtonState, EventType, RelAxis};
pub use mouse::Mouse;
pub use touchpad::TouchPad;
pub use traits::{ClickableDevice, PositionableDevice};
pub use validate::DEFAULT_DEVICE_PATH;
