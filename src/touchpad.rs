use crate::codec::InputEvent;
use crate::control::ControlChannel;
use crate::descriptor::{AxisBounds, DeviceDescriptor};
use crate::device::{Action, Capabilities, DeviceHandle};
use crate::error::{Error, Result};
use crate::event::{AbsAxis, Button};
use crate::traits::{ClickableDevice, PositionableDevice};
use crate::validate::validate_device_name;

/// Virtual touchpad reporting absolute positions inside fixed bounds.
#[derive(Debug)]
pub struct TouchPad {
    handle: DeviceHandle,
    bounds: AxisBounds,
}
impl TouchPad {
    /// Creates a touchpad on the uinput node at `path`.
    #[cfg(target_os = "linux")]
    pub fn create(
        path: impl AsRef<std::path::Path>,
        name: &[u8],
        bounds: AxisBounds,
    ) -> Result<Self> {
        crate::validate::validate_device_path(&path)?;
        Self::validate(name, bounds)?;
        let handle = DeviceHandle::open(
            path,
            Capabilities::touchpad(),
            DeviceDescriptor::touchpad(name, bounds),
        )?;
        Ok(Self { handle, bounds })
    }

    /// Creates a touchpad on an already open channel.
    pub fn with_channel(
        channel: Box<dyn ControlChannel>,
        name: &[u8],
        bounds: AxisBounds,
    ) -> Result<Self> {
        Self::validate(name, bounds)?;
        let handle = DeviceHandle::create(
            channel,
            Capabilities::touchpad(),
            DeviceDescriptor::touchpad(name, bounds),
        )?;
        Ok(Self { handle, bounds })
    }

    fn validate(name: &[u8], bounds: AxisBounds) -> Result<()> {
        validate_device_name(name)?;
        if !bounds.is_valid() {
            return Err(Error::InvalidBounds(format!(
                "x [{}, {}], y [{}, {}]: minimum exceeds maximum",
                bounds.min_x, bounds.max_x, bounds.min_y, bounds.max_y
            )));
        }
        Ok(())
    }

    pub fn bounds(&self) -> AxisBounds {
        self.bounds
    }

    pub fn handle(&self) -> &DeviceHandle {
        &self.handle
    }
}
impl PositionableDevice for TouchPad {
    fn move_to(&mut self, x: i32, y: i32) -> Result<()> {
        self.handle.emit(
            Action::MoveTo,
            &[
                InputEvent::absolute(AbsAxis::X, x),
                InputEvent::absolute(AbsAxis::Y, y),
            ],
        )
    }
}
impl ClickableDevice for TouchPad {
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
