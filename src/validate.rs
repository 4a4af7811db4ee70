use crate::error::{Error, Result};
use std::path::Path;

/// Length of the name field in `struct uinput_user_dev`.
pub const UINPUT_MAX_NAME_SIZE: usize = 80;

/// Default location of the uinput control node.
pub const DEFAULT_DEVICE_PATH: &str = "/dev/uinput";

pub fn validate_device_path(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(Error::InvalidPath("device path must not be empty".into()));
    }
    if !path.exists() {
        return Err(Error::InvalidPath(format!(
            "device path {} does not exist",
            path.display()
        )));
    }
    Ok(())
}

pub fn validate_device_name(name: &[u8]) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidName("device name must not be empty".into()));
    }
    if name.len() > UINPUT_MAX_NAME_SIZE {
        return Err(Error::InvalidName(format!(
            "device name is {} bytes, at most {} allowed",
            name.len(),
            UINPUT_MAX_NAME_SIZE
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_path_is_rejected() {
        assert!(matches!(validate_device_path(""), Err(Error::InvalidPath(_))));
    }

    #[test]
    fn test_missing_path_is_rejected() {
        let err = validate_device_path("/nonexistent/vinput/uinput").unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_existing_path_is_accepted() {
        validate_device_path(std::env::temp_dir()).unwrap();
    }

    #[test]
    fn test_name_length_limits() {
        assert!(matches!(validate_device_name(b""), Err(Error::InvalidName(_))));
        assert!(validate_device_name(&[b'x'; UINPUT_MAX_NAME_SIZE]).is_ok());
        assert!(matches!(
            validate_device_name(&[b'x'; UINPUT_MAX_NAME_SIZE + 1]),
            Err(Error::InvalidName(_))
        ));
    }
}
