use crate::codec::InputEvent;
use crate::control::ControlChannel;
use crate::descriptor::DeviceDescriptor;
use crate::device::{Action, Capabilities, DeviceHandle};
use crate::error::Result;
use crate::event::{Button, RelAxis};
use crate::traits::ClickableDevice;
use crate::validate::validate_device_name;

/// Virtual mouse reporting relative motion.
#[derive(Debug)]
pub struct Mouse {
    handle: DeviceHandle,
}
impl Mouse {
    /// Creates a mouse on the uinput node at `path`.
    #[cfg(target_os = "linux")]
    pub fn create(path: impl AsRef<std::path::Path>, name: &[u8]) -> Result<Self> {
        crate::validate::validate_device_path(&path)?;
        validate_device_name(name)?;
        let handle = DeviceHandle::open(path, Capabilities::mouse(), DeviceDescriptor::mouse(name))?;
        Ok(Self { handle })
    }

    /// Creates a mouse on an already open channel.
    pub fn with_channel(channel: Box<dyn ControlChannel>, name: &[u8]) -> Result<Self> {
        validate_device_name(name)?;
        let handle =
            DeviceHandle::create(channel, Capabilities::mouse(), DeviceDescriptor::mouse(name))?;
        Ok(Self { handle })
    }

    pub fn handle(&self) -> &DeviceHandle {
        &self.handle
    }

    fn move_rel(&mut self, action: Action, axis: RelAxis, delta: i32) -> Result<()> {
        self.handle.emit(action, &[InputEvent::relative(axis, delta)])
    }

    pub fn move_left(&mut self, pixels: i32) -> Result<()> {
        self.move_rel(Action::MoveLeft, RelAxis::X, pixels.saturating_neg())
    }

    pub fn move_right(&mut self, pixels: i32) -> Result<()> {
        self.move_rel(Action::MoveRight, RelAxis::X, pixels)
    }

    pub fn move_up(&mut self, pixels: i32) -> Result<()> {
        self.move_rel(Action::MoveUp, RelAxis::Y, pixels.saturating_neg())
    }

    pub fn move_down(&mut self, pixels: i32) -> Result<()> {
        self.move_rel(Action::MoveDown, RelAxis::Y, pixels)
    }
}
impl ClickableDevice for Mouse {
    fn press(&mut self, button: Button) -> Result<()> {
        self.handle.press(button)
    }

    fn release(&mut self, button: Button) -> Result<()> {
        self.handle.release(button)
    }

    fn click(&mut self, button: Button) -> Result<()> {
        self.handle.click(button)
    }

    fn close(&mut self) -> Result<()> {
        self.handle.close()
    }
}
