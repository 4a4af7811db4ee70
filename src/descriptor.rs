use crate::event::{ABS_CNT, AbsAxis, BusType};
use crate::validate::UINPUT_MAX_NAME_SIZE;

pub const VENDOR_ID: u16 = 0x4711;
pub const MOUSE_PRODUCT_ID: u16 = 0x0816;
pub const TOUCHPAD_PRODUCT_ID: u16 = 0x0817;
pub const DEVICE_VERSION: u16 = 1;

/// Size of `struct uinput_user_dev`.
pub const USER_DEV_SIZE: usize = UINPUT_MAX_NAME_SIZE + 8 + 4 + 4 * ABS_CNT * 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputId {
    pub bustype: u16,
    pub vendor: u16,
    pub product: u16,
    pub version: u16,
}
impl InputId {
    pub const fn usb(product: u16) -> Self {
        Self {
            bustype: BusType::Usb.to_code(),
            vendor: VENDOR_ID,
            product,
            version: DEVICE_VERSION,
        }
    }
}

/// Min/max range of the touchpad's X and Y axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisBounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}
impl AxisBounds {
    pub const fn new(min_x: i32, max_x: i32, min_y: i32, max_y: i32) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }

    pub fn range(&self, axis: AbsAxis) -> (i32, i32) {
        match axis {
            AbsAxis::X => (self.min_x, self.max_x),
            AbsAxis::Y => (self.min_y, self.max_y),
        }
    }
}

/// Identity and axis ranges handed to the kernel when the device is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    name: [u8; UINPUT_MAX_NAME_SIZE],
    id: InputId,
    bounds: Option<AxisBounds>,
}
impl DeviceDescriptor {
    /// Names longer than the kernel field are truncated; callers validate first.
    pub fn new(name: &[u8], id: InputId, bounds: Option<AxisBounds>) -> Self {
        let mut field = [0u8; UINPUT_MAX_NAME_SIZE];
        let len = name.len().min(UINPUT_MAX_NAME_SIZE);
        field[..len].copy_from_slice(&name[..len]);
        Self {
            name: field,
            id,
            bounds,
        }
    }

    pub fn mouse(name: &[u8]) -> Self {
        Self::new(name, InputId::usb(MOUSE_PRODUCT_ID), None)
    }

    pub fn touchpad(name: &[u8], bounds: AxisBounds) -> Self {
        Self::new(name, InputId::usb(TOUCHPAD_PRODUCT_ID), Some(bounds))
    }

    /// Name bytes without the zero padding.
    pub fn name(&self) -> &[u8] {
        let end = self
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(UINPUT_MAX_NAME_SIZE);
        &self.name[..end]
    }

    pub fn id(&self) -> InputId {
        self.id
    }

    pub fn bounds(&self) -> Option<AxisBounds> {
        self.bounds
    }

    /// Serializes into the `uinput_user_dev` layout in host byte order.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut absmax = [0i32; ABS_CNT];
        let mut absmin = [0i32; ABS_CNT];
        if let Some(bounds) = self.bounds {
            for axis in [AbsAxis::X, AbsAxis::Y] {
                let (min, max) = bounds.range(axis);
                absmin[axis.to_code() as usize] = min;
                absmax[axis.to_code() as usize] = max;
            }
        }

        let mut buf = Vec::with_capacity(USER_DEV_SIZE);
        buf.extend_from_slice(&self.name);
        buf.extend_from_slice(&self.id.bustype.to_ne_bytes());
        buf.extend_from_slice(&self.id.vendor.to_ne_bytes());
        buf.extend_from_slice(&self.id.product.to_ne_bytes());
        buf.extend_from_slice(&self.id.version.to_ne_bytes());
        // ff_effects_max
        buf.extend_from_slice(&0u32.to_ne_bytes());
        for table in [&absmax, &absmin] {
            for value in table.iter() {
                buf.extend_from_slice(&value.to_ne_bytes());
            }
        }
        // absfuzz and absflat stay zero
        buf.resize(USER_DEV_SIZE, 0);
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn i32_at(buf: &[u8], offset: usize) -> i32 {
        i32::from_ne_bytes(buf[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn test_user_dev_size_is_1116_bytes() {
        assert_eq!(USER_DEV_SIZE, 1116);
        assert_eq!(DeviceDescriptor::mouse(b"m").to_bytes().len(), USER_DEV_SIZE);
    }

    #[test]
    fn test_name_is_zero_padded() {
        let bytes = DeviceDescriptor::mouse(b"pointer").to_bytes();

        assert_eq!(&bytes[..7], b"pointer");
        assert!(bytes[7..UINPUT_MAX_NAME_SIZE].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_long_name_is_truncated_to_field() {
        let name = [b'a'; 100];
        let descriptor = DeviceDescriptor::mouse(&name);

        assert_eq!(descriptor.name().len(), UINPUT_MAX_NAME_SIZE);
    }

    #[test]
    fn test_identity_distinguishes_mouse_and_touchpad() {
        let mouse = DeviceDescriptor::mouse(b"m");
        let touchpad = DeviceDescriptor::touchpad(b"t", AxisBounds::new(0, 1, 0, 1));

        assert_eq!(mouse.id(), InputId { bustype: 0x03, vendor: 0x4711, product: 0x0816, version: 1 });
        assert_eq!(touchpad.id().product, 0x0817);
    }

    #[test]
    fn test_id_follows_name_field() {
        let bytes = DeviceDescriptor::mouse(b"m").to_bytes();
        let at = |o: usize| u16::from_ne_bytes([bytes[o], bytes[o + 1]]);

        assert_eq!(at(80), 0x03);
        assert_eq!(at(82), 0x4711);
        assert_eq!(at(84), 0x0816);
        assert_eq!(at(86), 1);
    }

    #[test]
    fn test_touchpad_bounds_are_indexed_by_axis_code() {
        let bytes =
            DeviceDescriptor::touchpad(b"t", AxisBounds::new(-10, 1920, 5, 1080)).to_bytes();
        let absmax = 92;
        let absmin = absmax + ABS_CNT * 4;

        assert_eq!(i32_at(&bytes, absmax), 1920);
        assert_eq!(i32_at(&bytes, absmax + 4), 1080);
        assert_eq!(i32_at(&bytes, absmin), -10);
        assert_eq!(i32_at(&bytes, absmin + 4), 5);
        assert_eq!(i32_at(&bytes, absmax + 8), 0);
    }

    #[test]
    fn test_bounds_validity() {
        assert!(AxisBounds::new(0, 0, 0, 10).is_valid());
        assert!(!AxisBounds::new(10, 0, 0, 10).is_valid());
        assert!(!AxisBounds::new(0, 10, 3, 2).is_valid());
    }
}
