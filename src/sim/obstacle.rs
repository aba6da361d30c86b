//! Obstacle stream: paired top/bottom rectangles scrolling right to left
//!
//! Pairs are appended at the tail as they spawn at the right screen edge and
//! all move left at the same speed, so the deque is always ordered by x and
//! retiring off-screen pairs is a prefix trim.

use std::collections::VecDeque;
use std::ops::RangeInclusive;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::RandomSource;
use crate::Rect;
use crate::tuning::Tuning;

/// Cosmetic obstacle color (no gameplay effect)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObstacleVariant {
    #[default]
    Green,
    Red,
}

impl ObstacleVariant {
    pub const COUNT: i32 = 2;

    pub fn from_index(index: i32) -> Self {
        if index.rem_euclid(Self::COUNT) == 0 {
            ObstacleVariant::Green
        } else {
            ObstacleVariant::Red
        }
    }
}

/// One obstacle: a top and bottom rectangle with a gap between them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstaclePair {
    pub top: Rect,
    pub bottom: Rect,
    /// Set once the actor has fully passed this pair
    pub scored: bool,
    pub variant: ObstacleVariant,
}

impl ObstaclePair {
    /// Build a pair at `x` whose gap of height `gap` is centered on `gap_center`
    pub fn new(
        x: f32,
        gap_center: f32,
        gap: f32,
        pipe_size: Vec2,
        variant: ObstacleVariant,
    ) -> Self {
        let half_gap = gap / 2.0;
        Self {
            top: Rect {
                pos: Vec2::new(x, gap_center - half_gap - pipe_size.y),
                size: pipe_size,
            },
            bottom: Rect {
                pos: Vec2::new(x, gap_center + half_gap),
                size: pipe_size,
            },
            scored: false,
            variant,
        }
    }

    /// Shared horizontal position (left edge)
    #[inline]
    pub fn x(&self) -> f32 {
        self.top.pos.x
    }

    /// Right edge of the pair
    #[inline]
    pub fn right(&self) -> f32 {
        self.top.right()
    }

    /// Open space between the two rectangles
    pub fn gap(&self) -> f32 {
        self.bottom.top() - self.top.bottom()
    }

    pub fn gap_center(&self) -> f32 {
        (self.top.bottom() + self.bottom.top()) / 2.0
    }

    fn shift_x(&mut self, dx: f32) {
        self.top.pos.x += dx;
        self.bottom.pos.x += dx;
    }
}

/// Fires every `interval` seconds of accumulated frame time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnTimer {
    pub elapsed: f32,
    pub interval: f32,
}

impl SpawnTimer {
    pub fn new(interval: f32) -> Self {
        Self {
            elapsed: 0.0,
            interval,
        }
    }

    /// Accumulate `dt`; returns true when due. The timer restarts at exactly
    /// zero rather than carrying the overshoot.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        if self.elapsed >= self.interval {
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }
}

/// Ordered stream of obstacle pairs (leftmost first)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleStream {
    pairs: VecDeque<ObstaclePair>,
    pipe_size: Vec2,
    gap: f32,
    margin: f32,
    variant: ObstacleVariant,
}

impl ObstacleStream {
    pub fn new(tuning: &Tuning, variant: ObstacleVariant) -> Self {
        Self {
            pairs: VecDeque::new(),
            pipe_size: Vec2::new(tuning.pipe_width, tuning.pipe_height),
            gap: tuning.gap_height(),
            margin: tuning.gap_margin,
            variant,
        }
    }

    pub fn gap(&self) -> f32 {
        self.gap
    }

    pub fn pipe_size(&self) -> Vec2 {
        self.pipe_size
    }

    pub fn variant(&self) -> ObstacleVariant {
        self.variant
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObstaclePair> {
        self.pairs.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ObstaclePair> {
        self.pairs.iter_mut()
    }

    /// Closed integer range the gap center is drawn from.
    ///
    /// When the gap plus margins do not fit the playable height the range
    /// collapses to the middle of the playable area.
    pub fn gap_center_range(&self, screen_height: f32, ground_offset: f32) -> RangeInclusive<i32> {
        let half_gap = self.gap / 2.0;
        let lo = (self.margin + half_gap).ceil();
        let hi = (screen_height - ground_offset - self.margin - half_gap).floor();

        if lo <= hi {
            lo as i32..=hi as i32
        } else {
            let mid = ((screen_height - ground_offset) / 2.0).round() as i32;
            log::warn!(
                "obstacle gap {} does not fit playable height {}; pinning gap center to {}",
                self.gap,
                screen_height - ground_offset,
                mid
            );
            mid..=mid
        }
    }

    /// Spawn a pair at the right screen edge with a random gap center.
    ///
    /// If the screen narrowed since the last spawn, the new pair starts just
    /// behind the tail pair instead, keeping the stream ordered by x.
    pub fn spawn(
        &mut self,
        screen: Vec2,
        ground_offset: f32,
        rng: &mut dyn RandomSource,
    ) -> &ObstaclePair {
        let range = self.gap_center_range(screen.y, ground_offset);
        let center = if range.start() == range.end() {
            *range.start()
        } else {
            rng.random_int(*range.start(), *range.end())
        };
        let x = self
            .pairs
            .back()
            .map_or(screen.x, |last| screen.x.max(last.right()));
        self.spawn_at(x, center as f32)
    }

    /// Append a pair at `x` with the given gap center. `x` is raised to the
    /// tail pair's x if it would land left of it.
    pub fn spawn_at(&mut self, x: f32, gap_center: f32) -> &ObstaclePair {
        let x = self.pairs.back().map_or(x, |last| x.max(last.x()));
        let pair = ObstaclePair::new(x, gap_center, self.gap, self.pipe_size, self.variant);
        log::trace!("spawned obstacle at x={x} gap_center={gap_center}");
        self.pairs.push_back(pair);
        &self.pairs[self.pairs.len() - 1]
    }

    /// Move every pair left by `speed * dt`
    pub fn advance(&mut self, dt: f32, speed: f32) {
        let dx = -speed * dt;
        for pair in &mut self.pairs {
            pair.shift_x(dx);
        }
    }

    /// Drop pairs that have fully left the screen; returns how many were removed
    pub fn evict_offscreen(&mut self) -> usize {
        let mut evicted = 0;
        while self
            .pairs
            .front()
            .is_some_and(|pair| pair.x() + self.pipe_size.x < 0.0)
        {
            self.pairs.pop_front();
            evicted += 1;
        }
        if evicted > 0 {
            log::trace!("evicted {evicted} obstacle(s), {} remaining", self.pairs.len());
        }
        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Always returns the lower bound, recording every requested range
    #[derive(Default)]
    struct LowRng {
        calls: Vec<(i32, i32)>,
    }

    impl RandomSource for LowRng {
        fn random_int(&mut self, min: i32, max: i32) -> i32 {
            self.calls.push((min, max));
            min
        }
    }

    fn stream_with_gap(gap: f32) -> ObstacleStream {
        let tuning = Tuning {
            gap_multiplier: 0.0,
            gap_floor: gap,
            ..Default::default()
        };
        ObstacleStream::new(&tuning, ObstacleVariant::Green)
    }

    #[test]
    fn test_pair_geometry_exact() {
        let mut stream = stream_with_gap(150.0);
        let pipe_h = stream.pipe_size().y;
        let pair = stream.spawn_at(288.0, 256.0).clone();

        assert_eq!(pair.top.pos.y, 256.0 - 75.0 - pipe_h);
        assert_eq!(pair.bottom.pos.y, 256.0 + 75.0);
        assert_eq!(pair.bottom.pos.y - (pair.top.pos.y + pair.top.size.y), 150.0);
        assert_eq!(pair.gap(), 150.0);
        assert_eq!(pair.gap_center(), 256.0);
        assert_eq!(pair.x(), 288.0);
        assert!(!pair.scored);
    }

    #[test]
    fn test_spawn_uses_screen_edge_and_range() {
        let mut stream = stream_with_gap(100.0);
        let mut rng = LowRng::default();
        let pair = stream.spawn(Vec2::new(288.0, 512.0), 112.0, &mut rng).clone();

        // margin 24 + gap/2 50 = 74; 512 - 112 - 24 - 50 = 326
        assert_eq!(rng.calls, vec![(74, 326)]);
        assert_eq!(pair.x(), 288.0);
        assert_eq!(pair.gap_center(), 74.0);
        assert_eq!(stream.len(), 1);
    }

    #[test]
    fn test_inverted_range_clamps_to_single_point() {
        let mut stream = stream_with_gap(450.0);
        let mut rng = LowRng::default();

        assert_eq!(stream.gap_center_range(512.0, 112.0), 200..=200);
        let pair = stream.spawn(Vec2::new(288.0, 512.0), 112.0, &mut rng).clone();
        assert!(rng.calls.is_empty());
        assert_eq!(pair.gap_center(), 200.0);
    }

    #[test]
    fn test_advance_moves_every_pair() {
        let mut stream = stream_with_gap(100.0);
        stream.spawn_at(100.0, 200.0);
        stream.spawn_at(250.0, 200.0);
        stream.advance(0.5, 120.0);

        let xs: Vec<f32> = stream.iter().map(|p| p.x()).collect();
        assert_eq!(xs, vec![40.0, 190.0]);
        for pair in stream.iter() {
            assert_eq!(pair.top.pos.x, pair.bottom.pos.x);
        }
    }

    #[test]
    fn test_evict_is_prefix_trim() {
        let mut stream = stream_with_gap(100.0);
        let w = stream.pipe_size().x;
        stream.spawn_at(-w - 1.0, 200.0);
        stream.spawn_at(-w, 200.0); // right edge exactly at 0: stays
        stream.spawn_at(10.0, 200.0);

        assert_eq!(stream.evict_offscreen(), 1);
        assert_eq!(stream.len(), 2);
        assert_eq!(stream.iter().next().map(|p| p.x()), Some(-w));
    }

    #[test]
    fn test_stream_drains_after_spawning() {
        let mut stream = stream_with_gap(100.0);
        let (dt, speed) = (1.0 / 60.0, 120.0);
        let w = stream.pipe_size().x;
        for i in 0..5 {
            stream.spawn_at(288.0 + i as f32 * 180.0, 200.0);
        }

        let mut frames = 0;
        while !stream.is_empty() {
            stream.advance(dt, speed);
            // Nothing drifts more than one tick past the eviction threshold
            for pair in stream.iter() {
                assert!(pair.x() + w >= -speed * dt - 1e-3);
            }
            stream.evict_offscreen();
            frames += 1;
            assert!(frames < 10_000, "stream never drained");
        }
        assert!(stream.is_empty());
    }

    #[test]
    fn test_spawn_after_screen_shrinks_stays_ordered() {
        let mut stream = stream_with_gap(100.0);
        let mut rng = LowRng::default();
        let w = stream.pipe_size().x;

        stream.spawn(Vec2::new(1000.0, 512.0), 112.0, &mut rng);
        stream.advance(1.5, 120.0);
        // Tail pair sits at x=820, right of the new 288 px edge
        let pair = stream.spawn(Vec2::new(288.0, 512.0), 112.0, &mut rng).clone();
        assert_eq!(pair.x(), 820.0 + w);

        // Explicit placement left of the tail is pulled up to it
        let pair = stream.spawn_at(10.0, 200.0).clone();
        assert_eq!(pair.x(), 820.0 + w);
        let xs: Vec<f32> = stream.iter().map(|p| p.x()).collect();
        assert!(xs.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_spawn_timer_resets_to_zero() {
        let mut timer = SpawnTimer::new(1.5);
        assert!(!timer.tick(1.0));
        assert!(timer.tick(0.75));
        assert_eq!(timer.elapsed, 0.0);
        assert!(!timer.tick(1.0));
    }

    #[test]
    fn test_variant_from_index() {
        assert_eq!(ObstacleVariant::from_index(0), ObstacleVariant::Green);
        assert_eq!(ObstacleVariant::from_index(1), ObstacleVariant::Red);
        assert_eq!(ObstacleVariant::from_index(3), ObstacleVariant::Red);
    }

    proptest! {
        #[test]
        fn prop_stream_sorted_across_resizes(
            seed in any::<u64>(),
            widths in prop::collection::vec(100.0f32..1600.0, 1..6),
        ) {
            use rand::SeedableRng;
            let mut rng = rand_pcg::Pcg32::seed_from_u64(seed);
            let tuning = Tuning::default();
            let mut stream = ObstacleStream::new(&tuning, ObstacleVariant::Green);
            let mut timer = SpawnTimer::new(tuning.spawn_interval);
            let dt = 1.0 / 60.0;

            for width in widths {
                let screen = Vec2::new(width, 512.0);
                for _ in 0..300 {
                    stream.advance(dt, tuning.pipe_speed);
                    stream.evict_offscreen();
                    if timer.tick(dt) {
                        stream.spawn(screen, tuning.ground_height, &mut rng);
                    }
                    let xs: Vec<f32> = stream.iter().map(|p| p.x()).collect();
                    prop_assert!(xs.windows(2).all(|w| w[0] <= w[1]));
                    // Prefix trim leaves nothing off-screen behind the head
                    prop_assert!(stream.iter().all(|p| p.right() >= 0.0));
                }
            }
        }

        #[test]
        fn prop_stream_sorted_and_bounded(
            seed in any::<u64>(),
            frames in 1usize..2000,
            dt in 0.005f32..0.05,
        ) {
            use rand::SeedableRng;
            let mut rng = rand_pcg::Pcg32::seed_from_u64(seed);
            let tuning = Tuning::default();
            let mut stream = ObstacleStream::new(&tuning, ObstacleVariant::Green);
            let mut timer = SpawnTimer::new(tuning.spawn_interval);
            let screen = Vec2::new(288.0, 512.0);

            // Screen crossing time divided by spawn interval, plus slack
            let max_len = ((screen.x + tuning.pipe_width) / tuning.pipe_speed
                / tuning.spawn_interval) as usize + 2;

            for _ in 0..frames {
                stream.advance(dt, tuning.pipe_speed);
                stream.evict_offscreen();
                if timer.tick(dt) {
                    let range = stream.gap_center_range(screen.y, tuning.ground_height);
                    let pair = stream.spawn(screen, tuning.ground_height, &mut rng);
                    prop_assert!(range.contains(&(pair.gap_center().round() as i32)));
                }

                prop_assert!(stream.len() <= max_len);
                let xs: Vec<f32> = stream.iter().map(|p| p.x()).collect();
                prop_assert!(xs.windows(2).all(|w| w[0] <= w[1]));
            }
        }
    }
}
