//! Global step index bookkeeping.
//!
//! Every `.scroll-step` element on the page shares one index space. Sections
//! claim contiguous ranges of it in document order.

use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    Collage,
    Denpasar,
    Badung,
    FloodImpact,
    Overview,
}

impl SectionId {
    pub const ALL: [SectionId; 5] = [
        SectionId::Collage,
        SectionId::Denpasar,
        SectionId::Badung,
        SectionId::FloodImpact,
        SectionId::Overview,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SectionId::Collage => "collage",
            SectionId::Denpasar => "denpasar",
            SectionId::Badung => "badung",
            SectionId::FloodImpact => "flood_impact",
            SectionId::Overview => "overview",
        }
    }

    pub fn from_name(name: &str) -> Option<SectionId> {
        SectionId::ALL.into_iter().find(|s| s.name() == name)
    }
}

impl std::fmt::Display for SectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Half-open range `[start, start + count)` of global step indices.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct StepRange {
    pub start: usize,
    pub count: usize,
}

impl StepRange {
    pub fn end(&self) -> usize {
        self.start + self.count
    }

    pub fn contains(&self, global: usize) -> bool {
        (self.start..self.end()).contains(&global)
    }

    pub fn local(&self, global: usize) -> Option<usize> {
        self.contains(global).then(|| global - self.start)
    }

    pub fn global(&self, local: usize) -> Option<usize> {
        (local < self.count).then(|| self.start + local)
    }

    fn overlaps(&self, other: &StepRange) -> bool {
        self.start < other.end() && other.start < self.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    DuplicateSection(SectionId),
    Overlap {
        section: SectionId,
        existing: SectionId,
    },
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::DuplicateSection(section) => {
                write!(f, "section {section} already has a step range")
            }
            RegistryError::Overlap { section, existing } => {
                write!(f, "steps of {section} overlap those of {existing}")
            }
        }
    }
}

impl std::error::Error for RegistryError {}

#[derive(Debug, Default, Clone)]
pub struct StepRangeRegistry {
    // Kept sorted by start.
    ranges: Vec<(SectionId, StepRange)>,
}

impl StepRangeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the next `count` indices after everything registered so far.
    pub fn register(&mut self, section: SectionId, count: usize) -> Result<StepRange, RegistryError> {
        let start = self.total_steps();
        self.register_at(section, start, count)
    }

    pub fn register_at(
        &mut self,
        section: SectionId,
        start: usize,
        count: usize,
    ) -> Result<StepRange, RegistryError> {
        if self.range(section).is_some() {
            return Err(RegistryError::DuplicateSection(section));
        }
        let range = StepRange { start, count };
        if let Some((existing, _)) = self
            .ranges
            .iter()
            .find(|(_, r)| count > 0 && r.overlaps(&range))
        {
            return Err(RegistryError::Overlap {
                section,
                existing: *existing,
            });
        }
        let at = self.ranges.partition_point(|(_, r)| r.start <= start);
        self.ranges.insert(at, (section, range));
        debug!(%section, start, count, "registered step range");
        Ok(range)
    }

    pub fn range(&self, section: SectionId) -> Option<StepRange> {
        self.ranges
            .iter()
            .find(|(s, _)| *s == section)
            .map(|(_, r)| *r)
    }

    /// Owning section and section-local index of a global step.
    pub fn resolve(&self, global: usize) -> Option<(SectionId, usize)> {
        self.ranges
            .iter()
            .find_map(|(s, r)| r.local(global).map(|local| (*s, local)))
    }

    /// One past the highest claimed index.
    pub fn total_steps(&self) -> usize {
        self.ranges.iter().map(|(_, r)| r.end()).max().unwrap_or(0)
    }

    pub fn sections(&self) -> impl Iterator<Item = (SectionId, StepRange)> + '_ {
        self.ranges.iter().copied()
    }
}
