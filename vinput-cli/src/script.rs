use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info};
use vinput::{ClickableDevice, Mouse, PositionableDevice, TouchPad};

/// One step of an action script.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    MoveTo { x: i32, y: i32 },
    MoveLeft { pixels: i32 },
    MoveRight { pixels: i32 },
    MoveUp { pixels: i32 },
    MoveDown { pixels: i32 },
    LeftClick,
    RightClick,
    LeftPress,
    LeftRelease,
    RightPress,
    RightRelease,
    Sleep { ms: u64 },
}
impl Step {
    fn is_relative(&self) -> bool {
        matches!(
            self,
            Step::MoveLeft { .. } | Step::MoveRight { .. } | Step::MoveUp { .. } | Step::MoveDown { .. }
        )
    }

    fn is_absolute(&self) -> bool {
        matches!(self, Step::MoveTo { .. })
    }
}

pub fn parse(json: &str) -> Result<Vec<Step>> {
    serde_json::from_str(json).context("Invalid action script")
}

/// Reads a script from a file, or from stdin when `path` is `-`.
pub fn load(path: &Path) -> Result<Vec<Step>> {
    let json = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read script from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?
    };
    parse(&json)
}

const SLEEP_SLICE: Duration = Duration::from_millis(50);

/// Sleeps for `duration`, waking early once `stop` is set. Returns false when
/// interrupted.
fn pause(duration: Duration, stop: &AtomicBool) -> bool {
    let deadline = Instant::now() + duration;
    loop {
        if stop.load(Ordering::Relaxed) {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        std::thread::sleep(SLEEP_SLICE.min(deadline - now));
    }
}

/// Device kinds a script can drive.
pub enum Target {
    Mouse(Mouse),
    TouchPad(TouchPad),
}
impl Target {
    fn clickable(&mut self) -> &mut dyn ClickableDevice {
        match self {
            Target::Mouse(mouse) => mouse,
            Target::TouchPad(pad) => pad,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Target::Mouse(_) => "mouse",
            Target::TouchPad(_) => "touchpad",
        }
    }

    fn apply(&mut self, step: &Step, stop: &AtomicBool) -> Result<()> {
        let kind = self.name();
        let result = match (self, step) {
            (Target::TouchPad(pad), Step::MoveTo { x, y }) => pad.move_to(*x, *y),
            (Target::Mouse(mouse), Step::MoveLeft { pixels }) => mouse.move_left(*pixels),
            (Target::Mouse(mouse), Step::MoveRight { pixels }) => mouse.move_right(*pixels),
            (Target::Mouse(mouse), Step::MoveUp { pixels }) => mouse.move_up(*pixels),
            (Target::Mouse(mouse), Step::MoveDown { pixels }) => mouse.move_down(*pixels),
            (target, Step::LeftClick) => target.clickable().left_click(),
            (target, Step::RightClick) => target.clickable().right_click(),
            (target, Step::LeftPress) => target.clickable().left_press(),
            (target, Step::LeftRelease) => target.clickable().left_release(),
            (target, Step::RightPress) => target.clickable().right_press(),
            (target, Step::RightRelease) => target.clickable().right_release(),
            (_, Step::Sleep { ms }) => {
                if !pause(Duration::from_millis(*ms), stop) {
                    debug!("Sleep of {} ms interrupted", ms);
                }
                Ok(())
            }
            (_, step) => bail!("{:?} is not supported by a {}", step, kind),
        };
        Ok(result?)
    }

    pub fn close(&mut self) -> vinput::Result<()> {
        self.clickable().close()
    }
}

/// Rejects steps the device kind cannot perform, before any device exists.
pub fn check(steps: &[Step], relative: bool) -> Result<()> {
    for (index, step) in steps.iter().enumerate() {
        if relative && step.is_absolute() {
            bail!("Step {}: {:?} needs a touchpad", index, step);
        }
        if !relative && step.is_relative() {
            bail!("Step {}: {:?} needs a mouse", index, step);
        }
    }
    Ok(())
}

/// Runs `steps` until done, a step fails or `stop` is set. The device is
/// closed on every path.
pub fn run(mut target: Target, steps: &[Step], stop: Arc<AtomicBool>) -> Result<()> {
    let kind = target.name();
    let mut outcome = Ok(());

    for (index, step) in steps.iter().enumerate() {
        if stop.load(Ordering::Relaxed) {
            info!("Stopping {} script before step {}", kind, index);
            break;
        }
        debug!("Step {}: {:?}", index, step);
        if let Err(e) = target.apply(step, &stop) {
            outcome = Err(e.context(format!("Step {} ({:?}) failed", index, step)));
            break;
        }
    }

    let closed = target
        .close()
        .with_context(|| format!("Failed to close {}", kind));
    outcome.and(closed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vinput::AxisBounds;
    use vinput::mock::RecordingChannel;

    #[test]
    fn test_parse_tagged_steps() {
        let steps = parse(
            r#"[{"action":"move_to","x":10,"y":20},{"action":"left_click"},{"action":"sleep","ms":5}]"#,
        )
        .unwrap();

        assert_eq!(
            steps,
            vec![Step::MoveTo { x: 10, y: 20 }, Step::LeftClick, Step::Sleep { ms: 5 }]
        );
    }

    #[test]
    fn test_parse_rejects_unknown_action() {
        assert!(parse(r#"[{"action":"scroll","amount":3}]"#).is_err());
    }

    #[test]
    fn test_check_matches_device_kind() {
        let absolute = [Step::MoveTo { x: 0, y: 0 }];
        let relative = [Step::MoveLeft { pixels: 1 }];

        assert!(check(&absolute, true).is_err());
        assert!(check(&relative, false).is_err());
        assert!(check(&absolute, false).is_ok());
        assert!(check(&[Step::LeftClick, Step::Sleep { ms: 0 }], true).is_ok());
    }

    #[test]
    fn test_run_closes_device_after_script() {
        // Arrange
        let (channel, log) = RecordingChannel::new();
        let pad = TouchPad::with_channel(Box::new(channel), b"cli", AxisBounds::new(0, 10, 0, 10))
            .unwrap();
        let steps = [Step::MoveTo { x: 1, y: 2 }, Step::RightClick];

        // Act
        run(Target::TouchPad(pad), &steps, Arc::new(AtomicBool::new(false))).unwrap();

        // Assert
        assert_eq!(log.events().len(), 3 + 4);
        assert!(log.is_closed());
    }

    #[test]
    fn test_run_stops_when_flag_is_set_and_still_closes() {
        let (channel, log) = RecordingChannel::new();
        let mouse = Mouse::with_channel(Box::new(channel), b"cli").unwrap();

        run(
            Target::Mouse(mouse),
            &[Step::MoveUp { pixels: 1 }],
            Arc::new(AtomicBool::new(true)),
        )
        .unwrap();

        assert!(log.events().is_empty());
        assert!(log.is_closed());
    }

    #[test]
    fn test_long_sleep_ends_when_stopped() {
        // Arrange
        let (channel, log) = RecordingChannel::new();
        let mouse = Mouse::with_channel(Box::new(channel), b"cli").unwrap();
        let stop = Arc::new(AtomicBool::new(false));
        let setter = Arc::clone(&stop);
        let started = Instant::now();

        // Act
        let interrupter = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(100));
            setter.store(true, Ordering::Relaxed);
        });
        run(
            Target::Mouse(mouse),
            &[Step::Sleep { ms: 3_600_000 }, Step::LeftClick],
            stop,
        )
        .unwrap();
        interrupter.join().unwrap();

        // Assert
        assert!(started.elapsed() < Duration::from_secs(10));
        assert!(log.events().is_empty());
        assert!(log.is_closed());
    }

    #[test]
    fn test_pause_runs_to_completion_without_stop() {
        let started = Instant::now();

        assert!(pause(Duration::from_millis(60), &AtomicBool::new(false)));
        assert!(started.elapsed() >= Duration::from_millis(60));
    }

    #[test]
    fn test_run_failure_still_closes() {
        let (channel, log) = RecordingChannel::new();
        let mouse = Mouse::with_channel(Box::new(channel.fail_write_at(0)), b"cli").unwrap();

        let err = run(
            Target::Mouse(mouse),
            &[Step::MoveDown { pixels: 1 }, Step::LeftClick],
            Arc::new(AtomicBool::new(false)),
        )
        .unwrap_err();

        assert!(err.to_string().starts_with("Step 0"));
        assert!(log.is_closed());
        assert_eq!(log.write_attempts(), 1);
    }
}
