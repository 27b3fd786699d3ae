//! Scroll step observation.
//!
//! The observer owns no DOM handles. The host measures each step element's
//! rect in viewport coordinates and feeds it in; `update` compares the step
//! under the offset line against the previous one and reports transitions.
//! Direction follows the document scroll offset, so a resize that reflows the
//! steps does not flip it.

use serde::Serialize;
use tracing::debug;

/// Offset line at half the viewport height.
pub const DEFAULT_OFFSET: f64 = 0.5;

/// Measured bounds of one step element, CSS px relative to the viewport top.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct StepRect {
    pub top: f64,
    pub height: f64,
}

impl StepRect {
    pub const fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    /// Half-open: a line exactly at the bottom edge belongs to the next step.
    pub fn contains(&self, y: f64) -> bool {
        self.top <= y && y < self.top + self.height
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Down,
    Up,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum StepEvent {
    Enter { index: usize, direction: Direction },
    Exit { index: usize, direction: Direction },
}

impl StepEvent {
    pub fn index(&self) -> usize {
        match *self {
            StepEvent::Enter { index, .. } | StepEvent::Exit { index, .. } => index,
        }
    }

    pub fn direction(&self) -> Direction {
        match *self {
            StepEvent::Enter { direction, .. } | StepEvent::Exit { direction, .. } => direction,
        }
    }

    pub fn is_enter(&self) -> bool {
        matches!(self, StepEvent::Enter { .. })
    }
}

#[derive(Debug, Clone)]
pub struct StepObserver {
    offset: f64,
    steps: Vec<StepRect>,
    active: Option<usize>,
    /// Document scroll offset at the previous update.
    last_scroll: Option<f64>,
    direction: Direction,
    attached: bool,
}

impl StepObserver {
    /// `offset` is clamped to [0, 1].
    pub fn new(offset: f64) -> Self {
        let offset = if offset.is_finite() {
            offset.clamp(0.0, 1.0)
        } else {
            DEFAULT_OFFSET
        };
        Self {
            offset,
            steps: Vec::new(),
            active: None,
            last_scroll: None,
            direction: Direction::Down,
            attached: true,
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Replace the measured rects, e.g. after scrolling or a resize.
    pub fn set_steps(&mut self, steps: Vec<StepRect>) {
        if let Some(active) = self.active {
            if active >= steps.len() {
                self.active = None;
            }
        }
        self.steps = steps;
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Re-evaluate which step sits under the offset line.
    ///
    /// Emits `Exit` for the previously active step, then `Enter` for the new
    /// one. Steps skipped over in a single update produce no events.
    pub fn update(&mut self, viewport_height: f64, scroll_y: f64) -> Vec<StepEvent> {
        if !self.attached || self.steps.is_empty() {
            return Vec::new();
        }

        if let Some(last) = self.last_scroll {
            if scroll_y > last {
                self.direction = Direction::Down;
            } else if scroll_y < last {
                self.direction = Direction::Up;
            }
        }
        self.last_scroll = Some(scroll_y);

        let line = self.offset * viewport_height;
        let now = self.steps.iter().position(|r| r.contains(line));
        if now == self.active {
            return Vec::new();
        }

        let direction = self.direction;
        let mut events = Vec::with_capacity(2);
        if let Some(index) = self.active {
            events.push(StepEvent::Exit { index, direction });
        }
        if let Some(index) = now {
            debug!(step = index, ?direction, "step enter");
            events.push(StepEvent::Enter { index, direction });
        }
        self.active = now;
        events
    }

    /// Stop producing events. There is no re-attach; build a new observer.
    pub fn detach(&mut self) {
        self.attached = false;
        self.steps.clear();
        self.active = None;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }
}

impl Default for StepObserver {
    fn default() -> Self {
        Self::new(DEFAULT_OFFSET)
    }
}

#[cfg(test)]
mod tests {
    use super::{Direction, StepEvent, StepObserver, StepRect};
    use pretty_assertions::assert_eq;

    const VH: f64 = 800.0;

    /// Three 600px steps starting at document y 0, seen from `scroll`.
    fn stacked(scroll: f64) -> Vec<StepRect> {
        (0..3)
            .map(|i| StepRect::new(600.0 * i as f64 - scroll, 600.0))
            .collect()
    }

    fn scroll_to(observer: &mut StepObserver, scroll: f64) -> Vec<StepEvent> {
        observer.set_steps(stacked(scroll));
        observer.update(VH, scroll)
    }

    #[test]
    fn no_steps_means_no_events() {
        let mut observer = StepObserver::default();
        assert!(observer.update(VH, 0.0).is_empty());
    }

    #[test]
    fn enters_first_step_under_offset_line() {
        let mut observer = StepObserver::default();
        assert_eq!(
            scroll_to(&mut observer, 0.0),
            vec![StepEvent::Enter { index: 0, direction: Direction::Down }]
        );
        assert!(observer.update(VH, 0.0).is_empty());
    }

    #[test]
    fn exit_precedes_enter_with_scroll_direction() {
        let mut observer = StepObserver::default();
        scroll_to(&mut observer, 0.0);

        assert_eq!(
            scroll_to(&mut observer, 400.0),
            vec![
                StepEvent::Exit { index: 0, direction: Direction::Down },
                StepEvent::Enter { index: 1, direction: Direction::Down },
            ]
        );

        assert_eq!(
            scroll_to(&mut observer, 0.0),
            vec![
                StepEvent::Exit { index: 1, direction: Direction::Up },
                StepEvent::Enter { index: 0, direction: Direction::Up },
            ]
        );
    }

    #[test]
    fn reflow_without_scrolling_keeps_direction() {
        let mut observer = StepObserver::default();
        scroll_to(&mut observer, 0.0);
        scroll_to(&mut observer, 500.0);
        assert_eq!(observer.active(), Some(1));

        // A resize grows the content above: steps move down 400px while the
        // scroll offset stays put.
        observer.set_steps(
            (0..3)
                .map(|i| StepRect::new(600.0 * i as f64 - 100.0, 600.0))
                .collect(),
        );
        assert_eq!(
            observer.update(VH, 500.0),
            vec![
                StepEvent::Exit { index: 1, direction: Direction::Down },
                StepEvent::Enter { index: 0, direction: Direction::Down },
            ]
        );
    }

    #[test]
    fn jumping_several_steps_skips_intermediates() {
        let mut observer = StepObserver::default();
        scroll_to(&mut observer, 0.0);
        let events = scroll_to(&mut observer, 1000.0);
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], StepEvent::Enter { index: 2, direction: Direction::Down });
    }

    #[test]
    fn leaving_all_steps_only_exits() {
        let mut observer = StepObserver::default();
        scroll_to(&mut observer, 0.0);
        observer.set_steps(stacked(-1000.0));
        assert_eq!(
            observer.update(VH, -1000.0),
            vec![StepEvent::Exit { index: 0, direction: Direction::Up }]
        );
        assert_eq!(observer.active(), None);
    }

    #[test]
    fn offset_line_is_half_open() {
        let mut observer = StepObserver::new(0.5);
        observer.set_steps(vec![StepRect::new(0.0, 400.0), StepRect::new(400.0, 400.0)]);
        let events = observer.update(VH, 0.0);
        assert_eq!(events, vec![StepEvent::Enter { index: 1, direction: Direction::Down }]);
    }

    #[test]
    fn detached_observer_is_silent() {
        let mut observer = StepObserver::default();
        observer.set_steps(stacked(0.0));
        observer.detach();
        assert!(!observer.is_attached());
        assert!(scroll_to(&mut observer, 400.0).is_empty());
    }
}
