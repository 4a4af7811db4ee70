//! `/dev/uinput` backed control channel.
//!
//! Uses the legacy setup path: capability bits via `UI_SET_*BIT`, then a
//! `struct uinput_user_dev` written to the file, then `UI_DEV_CREATE`.

use crate::control::{ControlChannel, ControlRequest};
use nix::sys::ioctl::ioctl_param_type;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::{AsRawFd, RawFd};
use std::path::Path;
use tracing::trace;

const UINPUT_IOCTL_BASE: u8 = b'U';

nix::ioctl_none!(ui_dev_create, UINPUT_IOCTL_BASE, 1);
nix::ioctl_none!(ui_dev_destroy, UINPUT_IOCTL_BASE, 2);
nix::ioctl_write_int!(ui_set_evbit, UINPUT_IOCTL_BASE, 100);
nix::ioctl_write_int!(ui_set_keybit, UINPUT_IOCTL_BASE, 101);
nix::ioctl_write_int!(ui_set_relbit, UINPUT_IOCTL_BASE, 102);
nix::ioctl_write_int!(ui_set_absbit, UINPUT_IOCTL_BASE, 103);

pub struct UinputFile {
    file: Option<File>,
}
impl UinputFile {
    /// Opens the control node write-only and non-blocking.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(path)?;
        Ok(Self { file: Some(file) })
    }

    fn file(&mut self) -> io::Result<&mut File> {
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "uinput file is closed"))
    }

    fn fd(&mut self) -> io::Result<RawFd> {
        Ok(self.file()?.as_raw_fd())
    }
}
impl ControlChannel for UinputFile {
    fn control(&mut self, request: ControlRequest) -> io::Result<()> {
        let fd = self.fd()?;
        trace!("uinput ioctl: {}", request);

        // SAFETY: `fd` is an open uinput descriptor owned by `self`, and each
        // request takes either no argument or an integer code.
        let result = unsafe {
            match &request {
                ControlRequest::EnableEventType(ty) => {
                    ui_set_evbit(fd, ty.to_code() as ioctl_param_type)
                }
                ControlRequest::RegisterKey(button) => {
                    ui_set_keybit(fd, button.to_code() as ioctl_param_type)
                }
                ControlRequest::RegisterRelAxis(axis) => {
                    ui_set_relbit(fd, axis.to_code() as ioctl_param_type)
                }
                ControlRequest::RegisterAbsAxis(axis) => {
                    ui_set_absbit(fd, axis.to_code() as ioctl_param_type)
                }
                ControlRequest::SetDescriptor(descriptor) => {
                    self.file()?.write_all(&descriptor.to_bytes())?;
                    ui_dev_create(fd)
                }
                ControlRequest::Destroy => ui_dev_destroy(fd),
            }
        };

        result.map(drop).map_err(io::Error::from)
    }

    fn write(&mut self, record: &[u8]) -> io::Result<()> {
        self.file()?.write_all(record)
    }

    fn close(&mut self) -> io::Result<()> {
        match self.file.take() {
            Some(file) => {
                drop(file);
                Ok(())
            }
            None => Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "uinput file already closed",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libc::c_int;
    use std::mem::size_of;

    #[test]
    fn test_request_codes_match_uinput_header() {
        assert_eq!(nix::request_code_write!(b'U', 100, size_of::<c_int>()) as u64, 0x40045564);
        assert_eq!(nix::request_code_write!(b'U', 101, size_of::<c_int>()) as u64, 0x40045565);
        assert_eq!(nix::request_code_write!(b'U', 102, size_of::<c_int>()) as u64, 0x40045566);
        assert_eq!(nix::request_code_write!(b'U', 103, size_of::<c_int>()) as u64, 0x40045567);
        assert_eq!(nix::request_code_none!(b'U', 1) as u64, 0x5501);
        assert_eq!(nix::request_code_none!(b'U', 2) as u64, 0x5502);
    }

    #[test]
    fn test_open_missing_node_fails() {
        assert!(UinputFile::open("/nonexistent/vinput/uinput").is_err());
    }

    #[test]
    fn test_closed_file_rejects_requests() {
        let path = std::env::temp_dir().join(format!("vinput-{}", ulid::Ulid::new()));
        std::fs::write(&path, b"").unwrap();
        let mut channel = UinputFile::open(&path).unwrap();

        channel.close().unwrap();

        assert_eq!(channel.write(&[0u8; 4]).unwrap_err().kind(), io::ErrorKind::NotConnected);
        assert!(channel.control(ControlRequest::Destroy).is_err());
        assert!(channel.close().is_err());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_create_on_plain_file_fails_at_first_registration() {
        // Arrange
        let path = std::env::temp_dir().join(format!("vinput-{}", ulid::Ulid::new()));
        std::fs::write(&path, b"").unwrap();

        // Act
        let mouse = crate::Mouse::create(&path, b"plain file mouse");
        let pad = crate::TouchPad::create(
            &path,
            b"plain file pad",
            crate::AxisBounds::new(0, 100, 0, 100),
        );

        // Assert
        for result in [mouse.map(|_| ()), pad.map(|_| ())] {
            match result {
                Err(crate::Error::Setup { stage, source }) => {
                    assert_eq!(stage, crate::SetupStage::EnableEvents(crate::EventType::Key));
                    assert_eq!(source.raw_os_error(), Some(libc::ENOTTY));
                }
                other => panic!("unexpected result: {:?}", other.err()),
            }
        }
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
        std::fs::remove_file(&path).unwrap();
    }
}
