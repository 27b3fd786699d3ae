//! Scroll-driven photo collage.
//!
//! Placement and reveal order are drawn once from an explicit seed, so the
//! same seed always lays the collage out the same way.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::debug;

use crate::viewport::ViewportProfile;

/// Resting position of a card, in percent of the collage box.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub left: f64,
    pub top: f64,
    pub rotation: f64,
    pub scale: f64,
    pub z_index: u32,
}

/// Entry animation: the card is thrown in from one side along an arc.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThrowPath {
    pub start_x: f64,
    pub start_y: f64,
    pub start_rotation: f64,
    pub duration_s: f64,
    pub delay_s: f64,
    pub arc_height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealableImage {
    pub src: String,
    pub position: Placement,
    pub throw: ThrowPath,
    /// Zero-based rank; the image shows once `revealed_count > reveal_order`.
    pub reveal_order: usize,
}

fn placement(rng: &mut StdRng) -> (Placement, ThrowPath) {
    let from_left = rng.gen_bool(0.5);
    let spin = rng.gen_range(-360.0..360.0);
    let position = Placement {
        left: rng.gen_range(-10.0..110.0),
        top: rng.gen_range(-10.0..110.0),
        rotation: rng.gen_range(-22.5..22.5),
        scale: rng.gen_range(0.9..1.1),
        z_index: rng.gen_range(1..=30),
    };
    let throw = ThrowPath {
        start_x: if from_left { -30.0 } else { 130.0 },
        start_y: rng.gen_range(80.0..100.0),
        start_rotation: spin + if from_left { 45.0 } else { -45.0 },
        duration_s: rng.gen_range(0.6..1.0),
        delay_s: rng.gen_range(0.0..0.3),
        arc_height: rng.gen_range(20.0..60.0),
    };
    (position, throw)
}

/// Section progress after entering step `index` of `step_count`.
pub fn step_progress(index: usize, step_count: usize) -> f64 {
    if step_count == 0 {
        return 0.0;
    }
    (index + 1) as f64 / step_count as f64
}

#[derive(Debug, Clone)]
pub struct CollageRevealer {
    images: Vec<RevealableImage>,
    revealed: usize,
}

impl CollageRevealer {
    pub fn new(urls: Vec<String>, seed: u64) -> Self {
        Self::with_profile(urls, seed, ViewportProfile::Desktop)
    }

    /// Phones keep every fourth image.
    pub fn with_profile(urls: Vec<String>, seed: u64, profile: ViewportProfile) -> Self {
        let mut urls: Vec<String> = match profile {
            ViewportProfile::Desktop => urls,
            ViewportProfile::Mobile => urls.into_iter().step_by(4).collect(),
        };
        let mut rng = StdRng::seed_from_u64(seed);
        urls.shuffle(&mut rng);

        let mut order: Vec<usize> = (0..urls.len()).collect();
        order.shuffle(&mut rng);

        let images = urls
            .into_iter()
            .zip(order)
            .map(|(src, reveal_order)| {
                let (position, throw) = placement(&mut rng);
                RevealableImage {
                    src,
                    position,
                    throw,
                    reveal_order,
                }
            })
            .collect();
        Self {
            images,
            revealed: 0,
        }
    }

    /// Advance to progress `p` (clamped to [0, 1]) and return the images that
    /// became visible, in reveal order. Lower progress never hides images.
    pub fn set_progress(&mut self, p: f64) -> Vec<&RevealableImage> {
        let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        let target = (p * self.images.len() as f64).floor() as usize;
        let previous = self.revealed;
        if target <= previous {
            return Vec::new();
        }
        self.revealed = target;
        debug!(previous, revealed = target, total = self.images.len(), "collage reveal");

        let mut fresh: Vec<&RevealableImage> = self
            .images
            .iter()
            .filter(|img| (previous..target).contains(&img.reveal_order))
            .collect();
        fresh.sort_by_key(|img| img.reveal_order);
        fresh
    }

    /// Indices into `images()` whose reveal rank falls in `[from, to)`, in rank order.
    pub fn revealed_between(&self, from: usize, to: usize) -> Vec<usize> {
        let mut picked: Vec<usize> = (0..self.images.len())
            .filter(|i| (from..to).contains(&self.images[*i].reveal_order))
            .collect();
        picked.sort_by_key(|i| self.images[*i].reveal_order);
        picked
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.images
            .get(index)
            .is_some_and(|img| img.reveal_order < self.revealed)
    }

    pub fn images(&self) -> &[RevealableImage] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{CollageRevealer, step_progress};
    use crate::viewport::ViewportProfile;
    use pretty_assertions::assert_eq;

    fn urls(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("https://img.example/{i}.png")).collect()
    }

    #[test]
    fn same_seed_same_layout() {
        let a = CollageRevealer::new(urls(20), 7);
        let b = CollageRevealer::new(urls(20), 7);
        assert_eq!(a.images(), b.images());
        let c = CollageRevealer::new(urls(20), 8);
        assert_ne!(a.images(), c.images());
    }

    #[test]
    fn placements_stay_in_range() {
        let collage = CollageRevealer::new(urls(50), 42);
        for img in collage.images() {
            let p = img.position;
            assert!((-10.0..110.0).contains(&p.left));
            assert!((-10.0..110.0).contains(&p.top));
            assert!((-22.5..22.5).contains(&p.rotation));
            assert!((0.9..1.1).contains(&p.scale));
            assert!((1..=30).contains(&p.z_index));
            assert!(img.throw.start_x == -30.0 || img.throw.start_x == 130.0);
            assert!((0.6..1.0).contains(&img.throw.duration_s));
            assert!((20.0..60.0).contains(&img.throw.arc_height));
        }
        let mut order: Vec<_> = collage.images().iter().map(|i| i.reveal_order).collect();
        order.sort_unstable();
        assert_eq!(order, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn revealed_count_is_floor_and_monotonic() {
        let mut collage = CollageRevealer::new(urls(75), 1);
        assert_eq!(collage.set_progress(0.2).len(), 15);
        assert_eq!(collage.revealed_count(), 15);
        assert_eq!(collage.set_progress(0.5).len(), 22);
        assert_eq!(collage.revealed_count(), 37);
        assert!(collage.set_progress(0.1).is_empty());
        assert_eq!(collage.revealed_count(), 37);
        collage.set_progress(3.0);
        assert_eq!(collage.revealed_count(), 75);
        assert!((0..75).all(|i| collage.is_revealed(i)));
    }

    #[test]
    fn newly_revealed_come_in_order() {
        let mut collage = CollageRevealer::new(urls(10), 3);
        let first: Vec<_> = collage.set_progress(0.3).iter().map(|i| i.reveal_order).collect();
        assert_eq!(first, vec![0, 1, 2]);
        let next: Vec<_> = collage.set_progress(0.5).iter().map(|i| i.reveal_order).collect();
        assert_eq!(next, vec![3, 4]);
        let shown = (0..10).filter(|i| collage.is_revealed(*i)).count();
        assert_eq!(shown, 5);
    }

    #[test]
    fn nan_progress_reveals_nothing() {
        let mut collage = CollageRevealer::new(urls(10), 3);
        assert!(collage.set_progress(f64::NAN).is_empty());
    }

    #[test]
    fn mobile_keeps_every_fourth_image() {
        let collage = CollageRevealer::with_profile(urls(75), 9, ViewportProfile::Mobile);
        assert_eq!(collage.len(), 19);
        assert!(collage.images().iter().all(|img| {
            let n: usize = img.src.trim_start_matches("https://img.example/")
                .trim_end_matches(".png")
                .parse()
                .unwrap();
            n % 4 == 0
        }));
    }

    #[test]
    fn step_progress_spans_the_section() {
        assert_eq!(step_progress(0, 5), 0.2);
        assert_eq!(step_progress(4, 5), 1.0);
        assert_eq!(step_progress(0, 0), 0.0);
    }

    #[test]
    fn empty_collage_is_inert() {
        let mut collage = CollageRevealer::new(Vec::new(), 0);
        assert!(collage.set_progress(1.0).is_empty());
        assert!(!collage.is_revealed(0));
    }
}
