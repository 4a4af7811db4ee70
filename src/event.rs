//! Event type, button and axis codes used by the virtual devices.
//!
//! Values match `linux/input-event-codes.h`. Only the codes the mouse and
//! touchpad actually register are modelled.

use std::fmt;

pub const EV_SYN: u16 = 0x00;
pub const EV_KEY: u16 = 0x01;
pub const EV_REL: u16 = 0x02;
pub const EV_ABS: u16 = 0x03;

pub const SYN_REPORT: u16 = 0x00;

pub const BTN_LEFT: u16 = 0x110;
pub const BTN_RIGHT: u16 = 0x111;

pub const REL_X: u16 = 0x00;
pub const REL_Y: u16 = 0x01;

pub const ABS_X: u16 = 0x00;
pub const ABS_Y: u16 = 0x01;

/// Number of absolute axes the kernel reserves room for (`ABS_CNT`).
pub const ABS_CNT: usize = 0x40;

pub const BUS_USB: u16 = 0x03;

/// Event categories a device can register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Syn,
    Key,
    Rel,
    Abs,
}
impl EventType {
    pub const fn to_code(self) -> u16 {
        match self {
            EventType::Syn => EV_SYN,
            EventType::Key => EV_KEY,
            EventType::Rel => EV_REL,
            EventType::Abs => EV_ABS,
        }
    }

    pub const fn from_code(code: u16) -> Option<Self> {
        match code {
            EV_SYN => Some(EventType::Syn),
            EV_KEY => Some(EventType::Key),
            EV_REL => Some(EventType::Rel),
            EV_ABS => Some(EventType::Abs),
            _ => None,
        }
    }
}
impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventType::Syn => "sync",
            EventType::Key => "key",
            EventType::Rel => "relative axis",
            EventType::Abs => "absolute axis",
        };
        f.write_str(name)
    }
}

/// Pointer buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Left,
    Right,
}
impl Button {
    pub const fn to_code(self) -> u16 {
        match self {
            Button::Left => BTN_LEFT,
            Button::Right => BTN_RIGHT,
        }
    }

    pub const fn from_code(code: u16) -> Option<Self> {
        match code {
            BTN_LEFT => Some(Button::Left),
            BTN_RIGHT => Some(Button::Right),
            _ => None,
        }
    }
}
impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Button::Left => f.write_str("left button"),
            Button::Right => f.write_str("right button"),
        }
    }
}

/// Button state carried in the value field of a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Released = 0,
    Pressed = 1,
}

/// Relative motion axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelAxis {
    X,
    Y,
}
impl RelAxis {
    pub const fn to_code(self) -> u16 {
        match self {
            RelAxis::X => REL_X,
            RelAxis::Y => REL_Y,
        }
    }

    pub const fn from_code(code: u16) -> Option<Self> {
        match code {
            REL_X => Some(RelAxis::X),
            REL_Y => Some(RelAxis::Y),
            _ => None,
        }
    }
}

/// Absolute position axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbsAxis {
    X,
    Y,
}
impl AbsAxis {
    pub const fn to_code(self) -> u16 {
        match self {
            AbsAxis::X => ABS_X,
            AbsAxis::Y => ABS_Y,
        }
    }

    pub const fn from_code(code: u16) -> Option<Self> {
        match code {
            ABS_X => Some(AbsAxis::X),
            ABS_Y => Some(AbsAxis::Y),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusType {
    Usb,
}
impl BusType {
    pub const fn to_code(self) -> u16 {
        match self {
            BusType::Usb => BUS_USB,
        }
    }
}
