//! Synthetic input events
//!
//! `send_input` accepts one of three shapes discriminated by the wire-level
//! `type` field. The shapes only partially overlap (a wheel event carries the
//! mouse fields plus scroll deltas), so the union is a tagged enum rather than
//! three free-standing structs.

use serde::{Deserialize, Serialize};

/// Keyboard and pointer modifiers active while an input event is dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Modifier {
    Shift,
    Control,
    Ctrl,
    Alt,
    Meta,
    Command,
    Cmd,
    IsKeypad,
    IsAutoRepeat,
    LeftButtonDown,
    MiddleButtonDown,
    RightButtonDown,
    CapsLock,
    NumLock,
    Left,
    Right,
}

/// Mouse button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// Mouse event kinds accepted by `send_input` (wheel has its own shape)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MouseEventKind {
    MouseDown,
    MouseUp,
    MouseMove,
    MouseEnter,
    MouseLeave,
    ContextMenu,
}

/// Keyboard event kinds accepted by `send_input`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyEventKind {
    RawKeyDown,
    KeyDown,
    KeyUp,
    Char,
}

/// A synthetic mouse event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MouseInput {
    #[serde(rename = "type")]
    pub kind: MouseEventKind,
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button: Option<MouseButton>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movement_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movement_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click_count: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<Modifier>,
}

impl MouseInput {
    /// A plain mouse event at the given coordinates
    pub fn new(kind: MouseEventKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            x,
            y,
            button: None,
            global_x: None,
            global_y: None,
            movement_x: None,
            movement_y: None,
            click_count: None,
            modifiers: Vec::new(),
        }
    }
}

/// Wire tag pinning the wheel shape to `"mouseWheel"`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WheelTag {
    #[default]
    MouseWheel,
}

/// A synthetic scroll-wheel event; carries the mouse fields plus deltas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelInput {
    #[serde(rename = "type", default)]
    pub kind: WheelTag,
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wheel_ticks_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wheel_ticks_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acceleration_ratio_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acceleration_ratio_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_precise_scrolling_deltas: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_scroll: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<Modifier>,
}

impl WheelInput {
    /// A scroll at the given coordinates with vertical/horizontal deltas
    pub fn new(x: f64, y: f64, delta_x: f64, delta_y: f64) -> Self {
        Self {
            kind: WheelTag::MouseWheel,
            x,
            y,
            delta_x: Some(delta_x),
            delta_y: Some(delta_y),
            wheel_ticks_x: None,
            wheel_ticks_y: None,
            acceleration_ratio_x: None,
            acceleration_ratio_y: None,
            has_precise_scrolling_deltas: None,
            can_scroll: None,
            modifiers: Vec::new(),
        }
    }
}

/// A synthetic keyboard event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyInput {
    #[serde(rename = "type")]
    pub kind: KeyEventKind,
    pub key_code: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<Modifier>,
}

impl KeyInput {
    /// A key event for the given key code
    pub fn new(kind: KeyEventKind, key_code: impl Into<String>) -> Self {
        Self {
            kind,
            key_code: key_code.into(),
            modifiers: Vec::new(),
        }
    }
}

/// The union accepted by `send_input`
///
/// Untagged on the wire: the `type` field of each shape disambiguates.
/// `Wheel` is tried first since `"mouseWheel"` only parses as the wheel tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputEvent {
    Wheel(WheelInput),
    Mouse(MouseInput),
    Key(KeyInput),
}

impl From<MouseInput> for InputEvent {
    fn from(e: MouseInput) -> Self {
        Self::Mouse(e)
    }
}

impl From<WheelInput> for InputEvent {
    fn from(e: WheelInput) -> Self {
        Self::Wheel(e)
    }
}

impl From<KeyInput> for InputEvent {
    fn from(e: KeyInput) -> Self {
        Self::Key(e)
    }
}

/// Every input kind the engine can observe, as reported on the input event
/// channel. Broader than what `send_input` accepts (gestures, touch, pointer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObservedInputKind {
    Undefined,
    MouseDown,
    MouseUp,
    MouseMove,
    MouseEnter,
    MouseLeave,
    ContextMenu,
    MouseWheel,
    RawKeyDown,
    KeyDown,
    KeyUp,
    Char,
    GestureScrollBegin,
    GestureScrollEnd,
    GestureScrollUpdate,
    GestureFlingStart,
    GestureFlingCancel,
    GesturePinchBegin,
    GesturePinchEnd,
    GesturePinchUpdate,
    GestureTapDown,
    GestureShowPress,
    GestureTap,
    GestureTapCancel,
    GestureShortPress,
    GestureLongPress,
    GestureLongTap,
    GestureTwoFingerTap,
    GestureTapUnconfirmed,
    GestureDoubleTap,
    TouchStart,
    TouchMove,
    TouchEnd,
    TouchCancel,
    TouchScrollStarted,
    PointerDown,
    PointerUp,
    PointerMove,
    PointerRawUpdate,
    PointerCancel,
    PointerCausedUaAction,
}

/// Payload of the input event channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDetails {
    #[serde(rename = "type")]
    pub kind: ObservedInputKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<Modifier>,
}

impl InputEvent {
    /// The observed kind this synthetic event will be reported as
    pub fn observed_kind(&self) -> ObservedInputKind {
        match self {
            InputEvent::Wheel(_) => ObservedInputKind::MouseWheel,
            InputEvent::Mouse(e) => match e.kind {
                MouseEventKind::MouseDown => ObservedInputKind::MouseDown,
                MouseEventKind::MouseUp => ObservedInputKind::MouseUp,
                MouseEventKind::MouseMove => ObservedInputKind::MouseMove,
                MouseEventKind::MouseEnter => ObservedInputKind::MouseEnter,
                MouseEventKind::MouseLeave => ObservedInputKind::MouseLeave,
                MouseEventKind::ContextMenu => ObservedInputKind::ContextMenu,
            },
            InputEvent::Key(e) => match e.kind {
                KeyEventKind::RawKeyDown => ObservedInputKind::RawKeyDown,
                KeyEventKind::KeyDown => ObservedInputKind::KeyDown,
                KeyEventKind::KeyUp => ObservedInputKind::KeyUp,
                KeyEventKind::Char => ObservedInputKind::Char,
            },
        }
    }

    /// The modifiers carried by this event
    pub fn modifiers(&self) -> &[Modifier] {
        match self {
            InputEvent::Wheel(e) => &e.modifiers,
            InputEvent::Mouse(e) => &e.modifiers,
            InputEvent::Key(e) => &e.modifiers,
        }
    }
}
