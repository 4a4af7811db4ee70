use crate::error::Result;
use crate::event::Button;

/// A device with left and right buttons.
pub trait ClickableDevice {
    /// Presses `button` and leaves it held.
    fn press(&mut self, button: Button) -> Result<()>;

    fn release(&mut self, button: Button) -> Result<()>;

    /// Press followed by release, each synced separately.
    fn click(&mut self, button: Button) -> Result<()>;

    /// Destroys the virtual device. Every later call fails with `Error::Closed`.
    fn close(&mut self) -> Result<()>;

    fn left_click(&mut self) -> Result<()> {
        self.click(Button::Left)
    }

    fn right_click(&mut self) -> Result<()> {
        self.click(Button::Right)
    }

    /// The button stays down until [`ClickableDevice::left_release`].
    fn left_press(&mut self) -> Result<()> {
        self.press(Button::Left)
    }

    fn left_release(&mut self) -> Result<()> {
        self.release(Button::Left)
    }

    /// The button stays down until [`ClickableDevice::right_release`].
    fn right_press(&mut self) -> Result<()> {
        self.press(Button::Right)
    }

    fn right_release(&mut self) -> Result<()> {
        self.release(Button::Right)
    }
}

/// A device that can jump to an absolute position.
pub trait PositionableDevice {
    /// Coordinates outside the registered range are passed through as is.
    fn move_to(&mut self, x: i32, y: i32) -> Result<()>;
}
