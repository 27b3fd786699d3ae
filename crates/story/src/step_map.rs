//! Per-section table from local step index to map state.

use crate::map_state::MapState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepMapError {
    StepOutOfRange { step: usize, step_count: usize },
}

impl std::fmt::Display for StepMapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepMapError::StepOutOfRange { step, step_count } => {
                write!(f, "step {step} is outside a {step_count}-step section")
            }
        }
    }
}

impl std::error::Error for StepMapError {}

/// Fixed-length table; `None` entries are blank steps that keep whatever the
/// map currently shows.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionStepMap {
    entries: Vec<Option<MapState>>,
}

impl SectionStepMap {
    pub fn builder(step_count: usize) -> SectionStepMapBuilder {
        SectionStepMapBuilder {
            entries: vec![None; step_count],
            error: None,
        }
    }

    /// Layout used by the story sections: a leading spacer showing the first
    /// state, then each state on its own step followed by a spacer that
    /// re-selects it, so scrolling up onto a spacer shows the text beside it.
    pub fn paired(states: Vec<MapState>) -> SectionStepMap {
        let mut entries = Vec::with_capacity(1 + states.len() * 2);
        if let Some(first) = states.first() {
            entries.push(Some(first.clone()));
        }
        for state in states {
            entries.push(Some(state.clone()));
            entries.push(Some(state));
        }
        SectionStepMap { entries }
    }

    /// One state on the first step, every later step blank.
    pub fn single(state: MapState, step_count: usize) -> SectionStepMap {
        let mut entries = vec![None; step_count];
        if let Some(first) = entries.first_mut() {
            *first = Some(state);
        }
        SectionStepMap { entries }
    }

    pub fn step_count(&self) -> usize {
        self.entries.len()
    }

    pub fn lookup(&self, step: usize) -> Option<&MapState> {
        self.entries.get(step).and_then(Option::as_ref)
    }

    pub fn is_blank(&self, step: usize) -> bool {
        step < self.entries.len() && self.entries[step].is_none()
    }

    /// First defined state, applied when the section mounts.
    pub fn initial(&self) -> Option<&MapState> {
        self.entries.iter().find_map(Option::as_ref)
    }

    pub fn states(&self) -> impl Iterator<Item = (usize, &MapState)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_ref().map(|s| (i, s)))
    }
}

#[derive(Debug, Clone)]
pub struct SectionStepMapBuilder {
    entries: Vec<Option<MapState>>,
    error: Option<StepMapError>,
}

impl SectionStepMapBuilder {
    pub fn state(mut self, step: usize, state: MapState) -> Self {
        self.put(step, Some(state));
        self
    }

    pub fn blank(mut self, step: usize) -> Self {
        self.put(step, None);
        self
    }

    fn put(&mut self, step: usize, entry: Option<MapState>) {
        let step_count = self.entries.len();
        match self.entries.get_mut(step) {
            Some(slot) => *slot = entry,
            None => {
                self.error
                    .get_or_insert(StepMapError::StepOutOfRange { step, step_count });
            }
        }
    }

    /// Reports the first out-of-range step, if any.
    pub fn build(self) -> Result<SectionStepMap, StepMapError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(SectionStepMap {
                entries: self.entries,
            }),
        }
    }
}
