//! Device lifecycle: capability negotiation, event emission and teardown.
//!
//! A [`DeviceHandle`] walks a fixed list of capability registrations on a
//! [`ControlChannel`], submits the descriptor and then owns the live device
//! until [`DeviceHandle::close`] (or drop) releases it.

use crate::codec::InputEvent;
use crate::control::{ControlChannel, ControlRequest};
use crate::descriptor::DeviceDescriptor;
use crate::error::{Error, Result};
use crate::event::{AbsAxis, Button, ButtonState, EventType, RelAxis};
use std::fmt;
use std::io;
use tracing::{debug, info, trace, warn};
use ulid::Ulid;

/// Setup step that was running when device creation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStage {
    EnableEvents(EventType),
    RegisterButton(Button),
    RegisterRelAxis(RelAxis),
    RegisterAbsAxis(AbsAxis),
    CreateDevice,
}
impl fmt::Display for SetupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupStage::EnableEvents(ty) => write!(f, "register {} events", ty),
            SetupStage::RegisterButton(button) => write!(f, "register {} events", button),
            SetupStage::RegisterRelAxis(RelAxis::X) => f.write_str("register relative x axis events"),
            SetupStage::RegisterRelAxis(RelAxis::Y) => f.write_str("register relative y axis events"),
            SetupStage::RegisterAbsAxis(AbsAxis::X) => f.write_str("register absolute x axis events"),
            SetupStage::RegisterAbsAxis(AbsAxis::Y) => f.write_str("register absolute y axis events"),
            SetupStage::CreateDevice => f.write_str("create device"),
        }
    }
}

/// State of a created device. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    Live,
    Closed,
}

/// How far registration has got on an open file, before the device exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum SetupProgress {
    FileOpen,
    CategoriesRegistered,
    CodesRegistered,
}
impl SetupProgress {
    /// Progress after `request` succeeded. Never moves backwards.
    pub(crate) fn after(self, request: &ControlRequest) -> Self {
        let reached = match request {
            ControlRequest::EnableEventType(_) => SetupProgress::CategoriesRegistered,
            _ => SetupProgress::CodesRegistered,
        };
        self.max(reached)
    }
}

/// High-level operation an event sequence belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveTo,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Click(Button),
    Press(Button),
    Release(Button),
    Emit,
}
impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = |button: &Button| match button {
            Button::Left => "left",
            Button::Right => "right",
        };
        match self {
            Action::MoveTo => f.write_str("move to"),
            Action::MoveLeft => f.write_str("move left"),
            Action::MoveRight => f.write_str("move right"),
            Action::MoveUp => f.write_str("move up"),
            Action::MoveDown => f.write_str("move down"),
            Action::Click(button) => write!(f, "{} click", side(button)),
            Action::Press(button) => write!(f, "{} press", side(button)),
            Action::Release(button) => write!(f, "{} release", side(button)),
            Action::Emit => f.write_str("emit"),
        }
    }
}

/// Ordered capability registrations for one device kind.
///
/// Every event type is enabled before the codes that belong to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    steps: Vec<(SetupStage, ControlRequest)>,
}
impl Capabilities {
    fn pointer_buttons() -> Vec<(SetupStage, ControlRequest)> {
        vec![
            (
                SetupStage::EnableEvents(EventType::Key),
                ControlRequest::EnableEventType(EventType::Key),
            ),
            (
                SetupStage::RegisterButton(Button::Left),
                ControlRequest::RegisterKey(Button::Left),
            ),
            (
                SetupStage::RegisterButton(Button::Right),
                ControlRequest::RegisterKey(Button::Right),
            ),
        ]
    }

    /// Left/right buttons plus relative X/Y motion.
    pub fn mouse() -> Self {
        let mut steps = Self::pointer_buttons();
        steps.push((
            SetupStage::EnableEvents(EventType::Rel),
            ControlRequest::EnableEventType(EventType::Rel),
        ));
        for axis in [RelAxis::X, RelAxis::Y] {
            steps.push((
                SetupStage::RegisterRelAxis(axis),
                ControlRequest::RegisterRelAxis(axis),
            ));
        }
        Self { steps }
    }

    /// Left/right buttons plus absolute X/Y position.
    pub fn touchpad() -> Self {
        let mut steps = Self::pointer_buttons();
        steps.push((
            SetupStage::EnableEvents(EventType::Abs),
            ControlRequest::EnableEventType(EventType::Abs),
        ));
        for axis in [AbsAxis::X, AbsAxis::Y] {
            steps.push((
                SetupStage::RegisterAbsAxis(axis),
                ControlRequest::RegisterAbsAxis(axis),
            ));
        }
        Self { steps }
    }

    pub fn steps(&self) -> impl Iterator<Item = &(SetupStage, ControlRequest)> {
        self.steps.iter()
    }

    /// Whether an event record may be written to a device with these capabilities.
    pub fn allows(&self, event: &InputEvent) -> bool {
        if event.is_sync() {
            return true;
        }
        let Some(ty) = EventType::from_code(event.event_type) else {
            return false;
        };
        self.steps.iter().any(|(_, request)| match (ty, request) {
            (EventType::Key, ControlRequest::RegisterKey(button)) => button.to_code() == event.code,
            (EventType::Rel, ControlRequest::RegisterRelAxis(axis)) => axis.to_code() == event.code,
            (EventType::Abs, ControlRequest::RegisterAbsAxis(axis)) => axis.to_code() == event.code,
            _ => false,
        })
    }
}

/// Human readable name of an event record, used in error messages.
pub(crate) fn describe(event: &InputEvent) -> String {
    match EventType::from_code(event.event_type) {
        Some(EventType::Syn) => "sync".to_string(),
        Some(EventType::Key) => match Button::from_code(event.code) {
            Some(button) => button.to_string(),
            None => format!("key {:#x}", event.code),
        },
        Some(EventType::Rel) => match RelAxis::from_code(event.code) {
            Some(axis) => format!("relative {:?} axis", axis),
            None => format!("relative axis {:#x}", event.code),
        },
        Some(EventType::Abs) => match AbsAxis::from_code(event.code) {
            Some(axis) => format!("absolute {:?} axis", axis),
            None => format!("absolute axis {:#x}", event.code),
        },
        None => format!("type {:#x} code {:#x}", event.event_type, event.code),
    }
}

/// Owner of one live virtual device.
pub struct DeviceHandle {
    id: Ulid,
    channel: Box<dyn ControlChannel>,
    capabilities: Capabilities,
    descriptor: DeviceDescriptor,
    state: DeviceState,
}
impl DeviceHandle {
    /// Opens the uinput node at `path` and creates the device on it.
    #[cfg(target_os = "linux")]
    pub fn open(
        path: impl AsRef<std::path::Path>,
        capabilities: Capabilities,
        descriptor: DeviceDescriptor,
    ) -> Result<Self> {
        let path = path.as_ref();
        let channel = crate::uinput::UinputFile::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Opened {}", path.display());
        Self::create(Box::new(channel), capabilities, descriptor)
    }

    /// Registers `capabilities` on an already open channel and submits the
    /// descriptor.
    ///
    /// On any failure the channel is closed before the error is returned.
    pub fn create(
        mut channel: Box<dyn ControlChannel>,
        capabilities: Capabilities,
        descriptor: DeviceDescriptor,
    ) -> Result<Self> {
        let id = Ulid::new();
        let mut progress = SetupProgress::FileOpen;

        for (stage, request) in capabilities.steps() {
            debug!("Device {}: {}", id, stage);
            if let Err(source) = channel.control(request.clone()) {
                return Err(Self::abort(id, channel, *stage, source));
            }
            let next = progress.after(request);
            if next != progress {
                trace!("Device {}: {:?} -> {:?}", id, progress, next);
                progress = next;
            }
        }

        debug!("Device {}: {}", id, SetupStage::CreateDevice);
        if let Err(source) = channel.control(ControlRequest::SetDescriptor(descriptor.clone())) {
            return Err(Self::abort(id, channel, SetupStage::CreateDevice, source));
        }

        info!(
            "Device {}: created \"{}\" ({:04x}:{:04x})",
            id,
            String::from_utf8_lossy(descriptor.name()),
            descriptor.id().vendor,
            descriptor.id().product
        );

        Ok(Self {
            id,
            channel,
            capabilities,
            descriptor,
            state: DeviceState::Live,
        })
    }

    fn abort(
        id: Ulid,
        mut channel: Box<dyn ControlChannel>,
        stage: SetupStage,
        source: io::Error,
    ) -> Error {
        warn!("Device {}: failed to {}: {}", id, stage, source);
        if let Err(e) = channel.close() {
            warn!("Device {}: closing after failed setup: {}", id, e);
        }
        Error::Setup { stage, source }
    }

    pub fn id(&self) -> Ulid {
        self.id
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn descriptor(&self) -> &DeviceDescriptor {
        &self.descriptor
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    fn ensure_live(&self) -> Result<()> {
        match self.state {
            DeviceState::Live => Ok(()),
            _ => Err(Error::Closed),
        }
    }

    /// Writes `events` one record at a time, then a sync marker.
    ///
    /// Stops at the first failed write. Records the device never registered
    /// are rejected before anything is written.
    pub fn emit(&mut self, action: Action, events: &[InputEvent]) -> Result<()> {
        self.ensure_live()?;

        if let Some(event) = events.iter().find(|e| !self.capabilities.allows(e)) {
            return Err(Error::Write {
                action,
                event: describe(event),
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "event code not registered on this device",
                ),
            });
        }

        for event in events {
            trace!("Device {}: {} {:?}", self.id, action, event);
            self.channel
                .write(&event.to_bytes())
                .map_err(|source| Error::Write {
                    action,
                    event: describe(event),
                    source,
                })?;
        }

        self.channel
            .write(&InputEvent::sync().to_bytes())
            .map_err(|source| Error::Sync { action, source })
    }

    pub fn press(&mut self, button: Button) -> Result<()> {
        self.emit(
            Action::Press(button),
            &[InputEvent::button(button, ButtonState::Pressed)],
        )
    }

    pub fn release(&mut self, button: Button) -> Result<()> {
        self.emit(
            Action::Release(button),
            &[InputEvent::button(button, ButtonState::Released)],
        )
    }

    /// Press and release, each followed by its own sync.
    pub fn click(&mut self, button: Button) -> Result<()> {
        let action = Action::Click(button);
        self.emit(action, &[InputEvent::button(button, ButtonState::Pressed)])?;
        self.emit(action, &[InputEvent::button(button, ButtonState::Released)])
    }

    /// Destroys the device and closes the file.
    ///
    /// The handle is `Closed` afterwards even if teardown reports an error.
    pub fn close(&mut self) -> Result<()> {
        self.ensure_live()?;
        self.state = DeviceState::Closed;

        let destroyed = self.channel.control(ControlRequest::Destroy);
        let closed = self.channel.close();
        info!("Device {}: closed", self.id);

        destroyed
            .and(closed)
            .map_err(|source| Error::Teardown { source })
    }
}
impl Drop for DeviceHandle {
    fn drop(&mut self) {
        if self.state == DeviceState::Live {
            warn!("Device {} dropped without close, releasing", self.id);
            if let Err(e) = self.close() {
                warn!("Device {}: {}", self.id, e);
            }
        }
    }
}
impl fmt::Debug for DeviceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceHandle")
            .field("id", &self.id)
            .field("descriptor", &self.descriptor)
            .field("state", &self.state)
            .finish()
    }
}
