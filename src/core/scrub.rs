// Pointer/touch scrubbing state machine

use crate::core::mapper::CoordinateMapper;
use serde::{Deserialize, Serialize};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    Mouse,
    Touch,
}

/// Touch start/move/end arrive as `Down`/`Move`/`Up`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub phase: PointerPhase,
    /// Horizontal position in client coordinates.
    pub client_x: f64,
    /// Primary button held. Touch moves scrub regardless.
    #[serde(default)]
    pub engaged: bool,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, phase: PointerPhase, client_x: f64, engaged: bool) -> Self {
        Self {
            kind,
            phase,
            client_x,
            engaged,
        }
    }

    /// A finger on the surface is always engaged; a mouse needs its button.
    pub fn is_engaged(&self) -> bool {
        self.engaged || self.kind == PointerKind::Touch
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScrubState {
    pub active: bool,
    pub x_position: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum Phase {
    #[default]
    Idle,
    Scrubbing { x: f64 },
}

/// Owned per chart; never shared between charts.
#[derive(Debug, Clone, Default)]
pub struct ScrubController {
    phase: Phase,
}

impl ScrubController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one event. `surface_left` and `width` describe the chart's
    /// current layout. Returns `true` when the state changed.
    pub fn handle(&mut self, event: &PointerEvent, surface_left: f64, width: f64) -> bool {
        let next = match (self.phase, event.phase) {
            (_, PointerPhase::Up | PointerPhase::Leave) => Phase::Idle,
            (_, PointerPhase::Down) => match clamp_offset(event.client_x, surface_left, width) {
                Some(x) => Phase::Scrubbing { x },
                None => self.phase,
            },
            (current, PointerPhase::Move) => {
                if !event.is_engaged() {
                    current
                } else {
                    match clamp_offset(event.client_x, surface_left, width) {
                        Some(x) => Phase::Scrubbing { x },
                        None => current,
                    }
                }
            }
        };

        let changed = next != self.phase;
        if changed {
            trace!(kind = ?event.kind, from = ?self.phase, to = ?next, "scrub transition");
        }
        self.phase = next;
        changed
    }

    pub fn is_scrubbing(&self) -> bool {
        matches!(self.phase, Phase::Scrubbing { .. })
    }

    pub fn x_position(&self) -> Option<f64> {
        match self.phase {
            Phase::Idle => None,
            Phase::Scrubbing { x } => Some(x),
        }
    }

    pub fn state(&self) -> ScrubState {
        ScrubState {
            active: self.is_scrubbing(),
            x_position: self.x_position(),
        }
    }

    /// Keeps the cursor inside the surface after a shrink.
    pub fn clamp_to(&mut self, width: f64) {
        if let Phase::Scrubbing { x } = self.phase {
            self.phase = Phase::Scrubbing {
                x: x.min(sanitize_width(width)).max(0.0),
            };
        }
    }

    /// Wall-clock time under the cursor, only while scrubbing.
    pub fn inspected_time(&self, mapper: &CoordinateMapper) -> Option<f64> {
        self.x_position().map(|x| mapper.x_to_time(x))
    }
}

fn sanitize_width(width: f64) -> f64 {
    if width.is_finite() && width > 0.0 {
        width
    } else {
        0.0
    }
}

fn clamp_offset(client_x: f64, surface_left: f64, width: f64) -> Option<f64> {
    let offset = client_x - surface_left;
    if !offset.is_finite() {
        return None;
    }
    Some(offset.max(0.0).min(sanitize_width(width)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mapper::Padding;
    use crate::core::model::{TimeWindow, ViewportSize};
    use approx::assert_relative_eq;

    fn mouse(phase: PointerPhase, x: f64, engaged: bool) -> PointerEvent {
        PointerEvent::new(PointerKind::Mouse, phase, x, engaged)
    }

    #[test]
    fn test_down_clamps_then_up_clears() {
        let mut scrub = ScrubController::new();
        assert!(scrub.handle(&mouse(PointerPhase::Down, 1000.0, true), 0.0, 500.0));
        assert_eq!(scrub.state(), ScrubState { active: true, x_position: Some(500.0) });

        assert!(scrub.handle(&mouse(PointerPhase::Up, 1000.0, false), 0.0, 500.0));
        assert_eq!(scrub.state(), ScrubState::default());

        let m = CoordinateMapper::build(
            ViewportSize::new(500.0, 100.0),
            TimeWindow::new(0.0, 100.0),
            &[],
            Padding::default(),
        )
        .unwrap();
        assert_eq!(scrub.inspected_time(&m), None);
    }

    #[test]
    fn test_offset_relative_to_surface_left() {
        let mut scrub = ScrubController::new();
        scrub.handle(&mouse(PointerPhase::Down, 20.0, true), 50.0, 500.0);
        assert_eq!(scrub.x_position(), Some(0.0));
        scrub.handle(&mouse(PointerPhase::Move, 175.0, true), 50.0, 500.0);
        assert_eq!(scrub.x_position(), Some(125.0));
    }

    #[test]
    fn test_move_without_engagement_is_ignored() {
        let mut scrub = ScrubController::new();
        assert!(!scrub.handle(&mouse(PointerPhase::Move, 100.0, false), 0.0, 500.0));
        assert!(!scrub.is_scrubbing());

        scrub.handle(&mouse(PointerPhase::Down, 100.0, true), 0.0, 500.0);
        assert!(!scrub.handle(&mouse(PointerPhase::Move, 300.0, false), 0.0, 500.0));
        assert_eq!(scrub.x_position(), Some(100.0));
    }

    #[test]
    fn test_touch_lifecycle() {
        let mut scrub = ScrubController::new();
        let touch = |phase, x, engaged| PointerEvent::new(PointerKind::Touch, phase, x, engaged);
        scrub.handle(&touch(PointerPhase::Down, 40.0, true), 0.0, 300.0);
        scrub.handle(&touch(PointerPhase::Move, -5.0, true), 0.0, 300.0);
        assert_eq!(scrub.x_position(), Some(0.0));
        scrub.handle(&touch(PointerPhase::Up, 0.0, false), 0.0, 300.0);
        assert!(!scrub.is_scrubbing());
    }

    #[test]
    fn test_touch_move_scrubs_without_engaged_flag() {
        let mut scrub = ScrubController::new();
        let down: PointerEvent =
            serde_json::from_str(r#"{"kind":"touch","phase":"down","client_x":10.0}"#).unwrap();
        let drag: PointerEvent =
            serde_json::from_str(r#"{"kind":"touch","phase":"move","client_x":200.0}"#).unwrap();
        assert!(!drag.engaged);

        scrub.handle(&down, 0.0, 500.0);
        assert!(scrub.handle(&drag, 0.0, 500.0));
        assert_eq!(scrub.x_position(), Some(200.0));
    }

    #[test]
    fn test_leave_resets() {
        let mut scrub = ScrubController::new();
        scrub.handle(&mouse(PointerPhase::Down, 10.0, true), 0.0, 100.0);
        scrub.handle(&mouse(PointerPhase::Leave, 10.0, true), 0.0, 100.0);
        assert_eq!(scrub.x_position(), None);
    }

    #[test]
    fn test_non_finite_position_keeps_state() {
        let mut scrub = ScrubController::new();
        assert!(!scrub.handle(&mouse(PointerPhase::Down, f64::NAN, true), 0.0, 100.0));
        assert!(!scrub.is_scrubbing());
        scrub.handle(&mouse(PointerPhase::Down, 10.0, true), 0.0, f64::NAN);
        assert_eq!(scrub.x_position(), Some(0.0));
    }

    #[test]
    fn test_inspected_time_inverts_mapper() {
        let m = CoordinateMapper::build(
            ViewportSize::new(400.0, 100.0),
            TimeWindow::new(1000.0, 1400.0),
            &[],
            Padding::default(),
        )
        .unwrap();
        let mut scrub = ScrubController::new();
        scrub.handle(&mouse(PointerPhase::Down, 100.0, true), 0.0, 400.0);
        assert_relative_eq!(scrub.inspected_time(&m).unwrap(), 1100.0);
    }

    #[test]
    fn test_clamp_after_shrink() {
        let mut scrub = ScrubController::new();
        scrub.handle(&mouse(PointerPhase::Down, 450.0, true), 0.0, 500.0);
        scrub.clamp_to(300.0);
        assert_eq!(scrub.x_position(), Some(300.0));
    }
}
