//! Event sequences produced by the public device API against the recording
//! channel.

use vinput::mock::{Call, RecordingChannel};
use vinput::{
    AbsAxis, AxisBounds, Button, ButtonState, ClickableDevice, ControlRequest, Error, EventType,
    InputEvent, Mouse, PositionableDevice, RelAxis, SetupStage, TouchPad,
};

const BOUNDS: AxisBounds = AxisBounds::new(0, 800, 0, 600);

#[test]
fn test_left_click_against_recording_channel() {
    // Arrange
    let (channel, log) = RecordingChannel::new();
    let mut pad = TouchPad::with_channel(Box::new(channel), b"it pad", BOUNDS).unwrap();

    // Act
    pad.left_click().unwrap();

    // Assert
    let events = log.events();
    assert_eq!(events.len(), 4);
    assert_eq!(events[0], InputEvent::button(Button::Left, ButtonState::Pressed));
    assert!(events[1].is_sync());
    assert_eq!(events[2], InputEvent::button(Button::Left, ButtonState::Released));
    assert!(events[3].is_sync());
}

#[test]
fn test_full_touchpad_session() {
    // Arrange
    let (channel, log) = RecordingChannel::new();
    let mut pad = TouchPad::with_channel(Box::new(channel), b"it pad", BOUNDS).unwrap();

    // Act
    pad.move_to(10, 20).unwrap();
    pad.right_press().unwrap();
    pad.move_to(30, 40).unwrap();
    pad.right_release().unwrap();
    pad.close().unwrap();

    // Assert
    let calls = log.calls();
    let writes: Vec<_> = calls
        .iter()
        .filter_map(|c| match c {
            Call::Write(e) => Some(*e),
            _ => None,
        })
        .collect();
    assert_eq!(
        writes,
        vec![
            InputEvent::absolute(AbsAxis::X, 10),
            InputEvent::absolute(AbsAxis::Y, 20),
            InputEvent::sync(),
            InputEvent::button(Button::Right, ButtonState::Pressed),
            InputEvent::sync(),
            InputEvent::absolute(AbsAxis::X, 30),
            InputEvent::absolute(AbsAxis::Y, 40),
            InputEvent::sync(),
            InputEvent::button(Button::Right, ButtonState::Released),
            InputEvent::sync(),
        ]
    );
    assert_eq!(calls.last(), Some(&Call::Close));
}

#[test]
fn test_every_operation_fails_after_close() {
    // Arrange
    let (channel, log) = RecordingChannel::new();
    let mut mouse = Mouse::with_channel(Box::new(channel), b"it mouse").unwrap();
    mouse.close().unwrap();
    let before = log.calls();

    // Act
    let results = [
        mouse.move_left(1),
        mouse.move_right(1),
        mouse.move_up(1),
        mouse.move_down(1),
        mouse.left_click(),
        mouse.right_click(),
        mouse.left_press(),
        mouse.left_release(),
        mouse.right_press(),
        mouse.right_release(),
        mouse.close(),
    ];

    // Assert
    for result in results {
        assert!(matches!(result, Err(Error::Closed)));
    }
    assert_eq!(log.calls(), before);
}

#[test]
fn test_failed_axis_registration_closes_channel() {
    // Arrange
    let (channel, log) = RecordingChannel::new();
    let channel = channel.fail_request(|r| matches!(r, ControlRequest::RegisterAbsAxis(_)));

    // Act
    let err = TouchPad::with_channel(Box::new(channel), b"it pad", BOUNDS).unwrap_err();

    // Assert
    match err {
        Error::Setup { stage, .. } => assert_eq!(stage, SetupStage::RegisterAbsAxis(AbsAxis::X)),
        other => panic!("unexpected error: {other}"),
    }
    assert!(log.is_closed());
    assert!(log.events().is_empty());
}

#[test]
fn test_failed_category_registration_names_stage() {
    let (channel, log) = RecordingChannel::new();
    let channel = channel.fail_request(|r| *r == ControlRequest::EnableEventType(EventType::Rel));

    let err = Mouse::with_channel(Box::new(channel), b"it mouse").unwrap_err();

    assert_eq!(err.to_string().split(':').next(), Some("failed to register relative axis events"));
    assert!(log.is_closed());
}

#[test]
fn test_mouse_signs() {
    let (channel, log) = RecordingChannel::new();
    let mut mouse = Mouse::with_channel(Box::new(channel), b"it mouse").unwrap();

    mouse.move_left(5).unwrap();
    mouse.move_down(5).unwrap();

    let events = log.events();
    assert_eq!(events[0], InputEvent::relative(RelAxis::X, -5));
    assert_eq!(events[2], InputEvent::relative(RelAxis::Y, 5));
}
