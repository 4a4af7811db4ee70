use std::path::PathBuf;
use vinput::DEFAULT_DEVICE_PATH;

/// Environment variable overriding the uinput node path.
pub const DEVICE_ENV: &str = "VINPUT_DEVICE";

/// Resolves the uinput node: explicit flag, then `VINPUT_DEVICE`, then
/// `/dev/uinput`.
pub fn device_path(flag: Option<PathBuf>) -> PathBuf {
    resolve(flag, std::env::var_os(DEVICE_ENV).map(PathBuf::from))
}

fn resolve(flag: Option<PathBuf>, env: Option<PathBuf>) -> PathBuf {
    flag.or(env.filter(|p| !p.as_os_str().is_empty()))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DEVICE_PATH))
}
