use std::collections::VecDeque;

use serde::Serialize;

use crate::frame::Frame;

/// Default number of events retained before the oldest are dropped.
pub const DEFAULT_EVENT_CAPACITY: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    StepEnter,
    StepExit,
    CameraJump,
    CameraFly,
    StateHeld,
    CollageReveal,
    DatasetLoaded,
    DatasetFailed,
    ContextLost,
}

/// One traced story event.
///
/// `scope` names what the event is about (a section or a dataset), so a trace
/// can be filtered without parsing `message`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub frame_index: u64,
    pub kind: EventKind,
    pub scope: String,
    pub message: String,
}

/// Bounded, append-only trace of what the story did per frame.
#[derive(Debug)]
pub struct EventBus {
    events: VecDeque<Event>,
    capacity: usize,
    dropped: u64,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity.min(DEFAULT_EVENT_CAPACITY)),
            capacity: capacity.max(1),
            dropped: 0,
        }
    }

    pub fn emit(
        &mut self,
        frame: Frame,
        kind: EventKind,
        scope: impl Into<String>,
        message: impl Into<String>,
    ) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(Event {
            frame_index: frame.index,
            kind,
            scope: scope.into(),
            message: message.into(),
        });
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn of_kind(&self, kind: EventKind) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events evicted because the bus was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn drain(&mut self) -> Vec<Event> {
        self.events.drain(..).collect()
    }
}
