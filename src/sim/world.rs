//! Procedural world generator
//!
//! Owns every train, barrier, coin, and power-up. Each tick the world scrolls
//! toward the player, new patterns are spawned ahead of a cursor, and anything
//! behind the camera is dropped.
//!
//! Safety rule: a pattern is only placed on lanes that are free of obstacles
//! across its whole z-span, and it always leaves at least one of those lanes
//! open. If no lane is free the spawn is skipped.

use std::f32::consts::TAU;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::spans_intersect;
use super::state::{
    Barrier, BarrierKind, Coin, PowerUp, PowerUpKind, TRAIN_COLORS, Train,
};
use crate::consts::*;
use crate::lane_x;
use crate::tuning::Tuning;

/// Pattern archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// One train, coins beside it
    SingleTrain,
    /// Trains on two lanes, coins down the open one
    DoubleTrain,
    /// Two trains on different lanes, the second further back
    StaggeredTrains,
    /// A train with a barrier in the neighbouring lane
    TrainBarrier,
    /// One low or high barrier
    SingleBarrier,
    /// Barriers on two lanes at offset depths
    StaggeredBarriers,
    /// No obstacles, just coins
    CoinRun,
}

impl Pattern {
    /// Cumulative roll thresholds
    const TABLE: [(Pattern, f32); 7] = [
        (Pattern::SingleTrain, 0.22),
        (Pattern::DoubleTrain, 0.40),
        (Pattern::StaggeredTrains, 0.53),
        (Pattern::TrainBarrier, 0.67),
        (Pattern::SingleBarrier, 0.79),
        (Pattern::StaggeredBarriers, 0.88),
        (Pattern::CoinRun, 1.0),
    ];

    fn from_roll(roll: f32) -> Self {
        Self::TABLE
            .iter()
            .find(|(_, threshold)| roll < *threshold)
            .map(|(pattern, _)| *pattern)
            .unwrap_or(Pattern::CoinRun)
    }

    /// Distinct lanes this pattern blocks
    pub fn obstacle_lanes(&self) -> usize {
        match self {
            Pattern::SingleTrain | Pattern::SingleBarrier => 1,
            Pattern::DoubleTrain
            | Pattern::StaggeredTrains
            | Pattern::TrainBarrier
            | Pattern::StaggeredBarriers => 2,
            Pattern::CoinRun => 0,
        }
    }

    /// A similar pattern that blocks one lane fewer
    pub fn downgrade(&self) -> Pattern {
        match self {
            Pattern::DoubleTrain | Pattern::StaggeredTrains | Pattern::TrainBarrier => {
                Pattern::SingleTrain
            }
            Pattern::StaggeredBarriers => Pattern::SingleBarrier,
            Pattern::SingleTrain | Pattern::SingleBarrier | Pattern::CoinRun => Pattern::CoinRun,
        }
    }
}

/// An obstacle waiting for a lane; `slot` indexes the lanes picked for it
#[derive(Debug, Clone, Copy)]
enum Piece {
    Train { slot: usize, z: f32, length: f32 },
    Barrier { slot: usize, z: f32, kind: BarrierKind },
}

impl Piece {
    fn z_span(&self) -> (f32, f32) {
        match *self {
            Piece::Train { z, length, .. } => (z, z + length),
            Piece::Barrier { z, .. } => (z, z + BARRIER_DEPTH),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum CoinShape {
    Line { start: f32, end: f32 },
    Arc { z: f32 },
}

impl CoinShape {
    const ARC_COINS: usize = 7;
    const ARC_SPACING: f32 = 2.0;

    fn z_span(&self) -> (f32, f32) {
        match *self {
            CoinShape::Line { start, end } => (start, end),
            CoinShape::Arc { z } => (z, z + (Self::ARC_COINS - 1) as f32 * Self::ARC_SPACING),
        }
    }
}

/// A pattern laid out in z, before lanes are assigned
#[derive(Debug, Clone)]
struct Plan {
    pattern: Pattern,
    pieces: Vec<Piece>,
    /// Coin runs, one per open lane (extra runs are dropped if lanes run out)
    coins: Vec<CoinShape>,
    span: (f32, f32),
}

/// Power-ups land this far past the pattern start
const POWERUP_OFFSET: (f32, f32) = (5.0, 15.0);

/// Spawned pattern summary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRecord {
    pub pattern: Pattern,
    /// Z range checked for free lanes (includes clearance)
    pub span: (f32, f32),
}

/// Borrowed view of a world entity for drawing
#[derive(Debug, Clone, Copy)]
pub enum SceneObject<'a> {
    Train(&'a Train),
    Barrier(&'a Barrier),
    Coin(&'a Coin),
    PowerUp(&'a PowerUp),
}

impl SceneObject<'_> {
    /// Depth used for back-to-front ordering
    pub fn sort_z(&self) -> f32 {
        match self {
            SceneObject::Train(t) => t.sort_z(),
            SceneObject::Barrier(b) => b.z,
            SceneObject::Coin(c) => c.z,
            SceneObject::PowerUp(p) => p.z,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WorldGenerator {
    pub trains: Vec<Train>,
    pub barriers: Vec<Barrier>,
    pub coins: Vec<Coin>,
    pub powerups: Vec<PowerUp>,
    /// World z where the next pattern will be placed
    pub next_spawn_z: f32,
    pub difficulty: f32,
    pub total_distance: f32,
    rng: Pcg32,
}

impl WorldGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            trains: Vec::new(),
            barriers: Vec::new(),
            coins: Vec::new(),
            powerups: Vec::new(),
            next_spawn_z: INITIAL_SPAWN_Z,
            difficulty: 1.0,
            total_distance: 0.0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Scroll, spawn ahead, clean up behind
    pub fn update(&mut self, speed: f32, dt: f32, tuning: &Tuning) {
        let step = (speed * dt).max(0.0);
        self.scroll(step);

        self.total_distance += step;
        self.difficulty = self
            .difficulty
            .max(tuning.difficulty_for(self.total_distance));

        while self.next_spawn_z < tuning.spawn_ahead {
            let z = self.next_spawn_z;
            if self.spawn_pattern(z, tuning).is_none() {
                log::debug!("Skipped spawn at z={:.1}: no free lane", z);
            }
            self.next_spawn_z += self.next_gap(tuning);
        }

        self.cleanup();
    }

    /// Move every entity and the spawn cursor toward the player
    pub fn scroll(&mut self, step: f32) {
        for t in &mut self.trains {
            t.z -= step;
        }
        for b in &mut self.barriers {
            b.z -= step;
        }
        for c in &mut self.coins {
            c.z -= step;
        }
        for p in &mut self.powerups {
            p.z -= step;
        }
        self.next_spawn_z -= step;
    }

    fn next_gap(&mut self, tuning: &Tuning) -> f32 {
        let base = self
            .rng
            .random_range(tuning.spawn_gap_min..=tuning.spawn_gap_max.max(tuning.spawn_gap_min));
        (base / self.difficulty.min(tuning.difficulty_gap_cap).max(1.0)).max(1.0)
    }

    /// Lanes with no train or barrier anywhere in `span`
    pub fn free_lanes(&self, span: (f32, f32)) -> Vec<usize> {
        (0..LANE_COUNT)
            .filter(|&lane| {
                let train_blocks = self
                    .trains
                    .iter()
                    .any(|t| t.lane == lane && spans_intersect(t.hitbox().z_span(), span));
                let barrier_blocks = self
                    .barriers
                    .iter()
                    .any(|b| b.lane == lane && spans_intersect(b.hitbox().z_span(), span));
                !train_blocks && !barrier_blocks
            })
            .collect()
    }

    /// Place one pattern at `z`; `None` when every lane was blocked
    pub fn spawn_pattern(&mut self, z: f32, tuning: &Tuning) -> Option<SpawnRecord> {
        let rolled = Pattern::from_roll(self.rng.random::<f32>());
        let mut plan = self.plan(rolled, z, tuning);
        let mut free = self.free_lanes(plan.span);

        // Must leave at least one free lane open after placing
        while !free.is_empty() && plan.pattern.obstacle_lanes() >= free.len() {
            let smaller = plan.pattern.downgrade();
            log::debug!(
                "Downgrading {:?} -> {:?} ({} free lanes)",
                plan.pattern,
                smaller,
                free.len()
            );
            plan = self.plan(smaller, z, tuning);
            free = self.free_lanes(plan.span);
        }
        if free.is_empty() {
            return None;
        }

        free.shuffle(&mut self.rng);
        let (blocked, open) = free.split_at(plan.pattern.obstacle_lanes());

        for piece in &plan.pieces {
            match *piece {
                Piece::Train { slot, z, length } => {
                    let color = TRAIN_COLORS[self.rng.random_range(0..TRAIN_COLORS.len())];
                    self.trains.push(Train::new(blocked[slot], z, length, color));
                }
                Piece::Barrier { slot, z, kind } => {
                    self.barriers.push(Barrier::new(blocked[slot], z, kind));
                }
            }
        }

        for (shape, &lane) in plan.coins.iter().zip(open.iter()) {
            self.place_coins(*shape, lane);
        }

        if self.rng.random::<f32>() < tuning.powerup_chance {
            let lane = open[self.rng.random_range(0..open.len())];
            let kind = PowerUpKind::ALL[self.rng.random_range(0..PowerUpKind::ALL.len())];
            let pz = z + self.rng.random_range(POWERUP_OFFSET.0..POWERUP_OFFSET.1);
            let phase = self.rng.random::<f32>() * TAU;
            self.powerups.push(PowerUp::new(lane, pz, kind, phase));
        }

        Some(SpawnRecord {
            pattern: plan.pattern,
            span: plan.span,
        })
    }

    /// Lay out a pattern in z without choosing lanes
    fn plan(&mut self, pattern: Pattern, z: f32, tuning: &Tuning) -> Plan {
        let mut pieces = Vec::new();
        let mut coins = Vec::new();

        match pattern {
            Pattern::SingleTrain => {
                let length = self
                    .rng
                    .random_range(tuning.train_length_min..tuning.train_length_max);
                pieces.push(Piece::Train { slot: 0, z, length });
                coins.push(CoinShape::Line { start: z, end: z + 8.0 });
            }
            Pattern::DoubleTrain => {
                for slot in 0..2 {
                    let length = self.rng.random_range(8.0..14.0);
                    pieces.push(Piece::Train { slot, z, length });
                }
                coins.push(CoinShape::Line { start: z, end: z + 6.0 });
            }
            Pattern::StaggeredTrains => {
                let first = self.rng.random_range(10.0..18.0);
                let offset = self.rng.random_range(15.0..25.0);
                let second = self.rng.random_range(10.0..18.0);
                pieces.push(Piece::Train { slot: 0, z, length: first });
                pieces.push(Piece::Train {
                    slot: 1,
                    z: z + offset,
                    length: second,
                });
                coins.push(CoinShape::Line {
                    start: z + 5.0,
                    end: z + 15.0,
                });
            }
            Pattern::TrainBarrier => {
                let length = self.rng.random_range(10.0..16.0);
                let barrier_z = z + self.rng.random_range(3.0..6.0);
                let kind = self.random_barrier_kind();
                pieces.push(Piece::Train { slot: 0, z, length });
                pieces.push(Piece::Barrier {
                    slot: 1,
                    z: barrier_z,
                    kind,
                });
                coins.push(CoinShape::Line { start: z, end: z + 8.0 });
            }
            Pattern::SingleBarrier => {
                let kind = self.random_barrier_kind();
                pieces.push(Piece::Barrier { slot: 0, z, kind });
                coins.push(CoinShape::Line {
                    start: z - 3.0,
                    end: z + 3.0,
                });
            }
            Pattern::StaggeredBarriers => {
                let offset = self.rng.random_range(4.0..8.0);
                let first = self.random_barrier_kind();
                let second = self.random_barrier_kind();
                pieces.push(Piece::Barrier {
                    slot: 0,
                    z,
                    kind: first,
                });
                pieces.push(Piece::Barrier {
                    slot: 1,
                    z: z + offset,
                    kind: second,
                });
                coins.push(CoinShape::Line {
                    start: z - 3.0,
                    end: z + offset + 3.0,
                });
            }
            Pattern::CoinRun => {
                coins.push(CoinShape::Arc { z });
                if self.rng.random_bool(0.5) {
                    coins.push(CoinShape::Line {
                        start: z,
                        end: z + 10.0,
                    });
                }
            }
        }

        let mut span = (z, z + POWERUP_OFFSET.1);
        for (lo, hi) in pieces
            .iter()
            .map(Piece::z_span)
            .chain(coins.iter().map(CoinShape::z_span))
        {
            span.0 = span.0.min(lo);
            span.1 = span.1.max(hi);
        }
        span.0 -= SPAWN_CLEARANCE;
        span.1 += SPAWN_CLEARANCE;

        Plan {
            pattern,
            pieces,
            coins,
            span,
        }
    }

    fn random_barrier_kind(&mut self) -> BarrierKind {
        if self.rng.random_bool(0.5) {
            BarrierKind::Low
        } else {
            BarrierKind::High
        }
    }

    fn place_coins(&mut self, shape: CoinShape, lane: usize) {
        let x = lane_x(lane);
        match shape {
            CoinShape::Line { start, end } => {
                let mut z = start;
                while z <= end {
                    let phase = self.rng.random::<f32>() * TAU;
                    self.coins.push(Coin::new(x, COIN_HEIGHT, z, phase));
                    z += COIN_LINE_SPACING;
                }
            }
            CoinShape::Arc { z } => {
                let last = (CoinShape::ARC_COINS - 1) as f32;
                for i in 0..CoinShape::ARC_COINS {
                    let t = i as f32 / last;
                    let y = COIN_HEIGHT + (t * std::f32::consts::PI).sin() * COIN_ARC_RISE;
                    let phase = self.rng.random::<f32>() * TAU;
                    self.coins
                        .push(Coin::new(x, y, z + i as f32 * CoinShape::ARC_SPACING, phase));
                }
            }
        }
    }

    /// Drop entities behind the camera and anything already collected
    pub fn cleanup(&mut self) {
        self.trains.retain(|t| t.z + t.length > TRAIN_CLEANUP_Z);
        self.barriers.retain(|b| b.z > ENTITY_CLEANUP_Z);
        self.coins.retain(|c| c.z > ENTITY_CLEANUP_Z && !c.collected);
        self.powerups.retain(|p| p.z > ENTITY_CLEANUP_Z && !p.collected);
    }

    /// Every visible entity, farthest first
    pub fn sorted_objects(&self) -> Vec<SceneObject<'_>> {
        let mut all: Vec<SceneObject<'_>> = Vec::with_capacity(
            self.trains.len() + self.barriers.len() + self.coins.len() + self.powerups.len(),
        );
        all.extend(self.trains.iter().map(SceneObject::Train));
        all.extend(self.barriers.iter().map(SceneObject::Barrier));
        all.extend(
            self.coins
                .iter()
                .filter(|c| !c.collected)
                .map(SceneObject::Coin),
        );
        all.extend(
            self.powerups
                .iter()
                .filter(|p| !p.collected)
                .map(SceneObject::PowerUp),
        );
        all.sort_by(|a, b| b.sort_z().total_cmp(&a.sort_z()));
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// (z, extent past z) per entity: trains, barriers, coins, power-ups
    fn depths(world: &WorldGenerator) -> [Vec<(f32, f32)>; 4] {
        [
            world.trains.iter().map(|t| (t.z, t.length)).collect(),
            world.barriers.iter().map(|b| (b.z, 0.0)).collect(),
            world.coins.iter().map(|c| (c.z, 0.0)).collect(),
            world.powerups.iter().map(|p| (p.z, 0.0)).collect(),
        ]
    }

    fn lane_blocked(world: &WorldGenerator, lane: usize, span: (f32, f32)) -> bool {
        !world.free_lanes(span).contains(&lane)
    }

    #[test]
    fn test_first_update_fills_lookahead() {
        let tuning = Tuning::default();
        let mut world = WorldGenerator::new(7);
        world.update(tuning.initial_speed, 0.016, &tuning);
        assert!(world.next_spawn_z >= tuning.spawn_ahead);
        assert!(!world.coins.is_empty());
    }

    #[test]
    fn test_scroll_moves_everything_equally() {
        let tuning = Tuning::default();
        let mut world = WorldGenerator::new(3);
        world.update(tuning.initial_speed, 0.016, &tuning);
        let before: Vec<f32> = world.trains.iter().map(|t| t.z).collect();
        let coins_before: Vec<f32> = world.coins.iter().map(|c| c.z).collect();
        world.scroll(2.5);
        for (t, z) in world.trains.iter().zip(before) {
            assert_eq!(t.z, z - 2.5);
        }
        for (c, z) in world.coins.iter().zip(coins_before) {
            assert_eq!(c.z, z - 2.5);
        }
    }

    #[test]
    fn test_skip_when_all_lanes_blocked() {
        let tuning = Tuning::default();
        let mut world = WorldGenerator::new(11);
        for lane in 0..LANE_COUNT {
            world
                .trains
                .push(Train::new(lane, 50.0, 100.0, TRAIN_COLORS[0]));
        }
        let trains = world.trains.len();
        let coins = world.coins.len();
        assert!(world.spawn_pattern(100.0, &tuning).is_none());
        assert_eq!(world.trains.len(), trains);
        assert_eq!(world.coins.len(), coins);
    }

    #[test]
    fn test_single_free_lane_downgrades_to_coins() {
        let tuning = Tuning::default();
        let mut world = WorldGenerator::new(5);
        world.trains.push(Train::new(0, 0.0, 300.0, TRAIN_COLORS[1]));
        world.trains.push(Train::new(2, 0.0, 300.0, TRAIN_COLORS[2]));
        for i in 0..20 {
            let record = world.spawn_pattern(100.0 + i as f32, &tuning).unwrap();
            assert_eq!(record.pattern, Pattern::CoinRun);
        }
        assert_eq!(world.trains.len(), 2);
        assert!(world.barriers.is_empty());
        assert!(world.coins.iter().all(|c| c.x == 0.0));
    }

    #[test]
    fn test_downgrade_chain_ends_in_coin_run() {
        for pattern in Pattern::TABLE.iter().map(|(p, _)| *p) {
            let mut p = pattern;
            for _ in 0..3 {
                p = p.downgrade();
            }
            assert_eq!(p, Pattern::CoinRun);
        }
    }

    #[test]
    fn test_coins_never_inside_new_obstacles() {
        let tuning = Tuning::default();
        let mut world = WorldGenerator::new(21);
        for _ in 0..200 {
            world.update(120.0, 0.05, &tuning);
        }
        for coin in &world.coins {
            for t in &world.trains {
                let inside = (coin.x - t.x()).abs() < 0.01 && coin.z >= t.z && coin.z <= t.z + t.length;
                assert!(!inside, "coin at {:?} inside train {:?}", coin.pos(), t);
            }
        }
    }

    #[test]
    fn test_inverted_tuning_ranges_do_not_panic() {
        let tuning = Tuning::from_json(
            r#"{ "train_length_min": 20.0, "train_length_max": 10.0, "spawn_gap_min": 40.0, "spawn_gap_max": 20.0 }"#,
        );
        let mut world = WorldGenerator::new(21);
        for _ in 0..200 {
            world.update(120.0, 0.05, &tuning);
        }
        assert!(world.total_distance > 0.0);
    }

    #[test]
    fn test_cleanup_thresholds() {
        let mut world = WorldGenerator::new(1);
        world.trains.push(Train::new(0, -15.0, 6.0, TRAIN_COLORS[0])); // tail at -9: kept
        world.trains.push(Train::new(1, -25.0, 10.0, TRAIN_COLORS[0])); // tail at -15: dropped
        world.barriers.push(Barrier::new(0, -6.0, BarrierKind::Low));
        world.coins.push(Coin::new(0.0, 1.2, -4.0, 0.0));
        let mut collected = Coin::new(0.0, 1.2, 10.0, 0.0);
        collected.collected = true;
        world.coins.push(collected);
        world.cleanup();
        assert_eq!(world.trains.len(), 1);
        assert!(world.barriers.is_empty());
        assert_eq!(world.coins.len(), 1);
    }

    #[test]
    fn test_sorted_back_to_front() {
        let mut world = WorldGenerator::new(1);
        world.trains.push(Train::new(0, 10.0, 20.0, TRAIN_COLORS[0])); // sort 20
        world.barriers.push(Barrier::new(1, 30.0, BarrierKind::High));
        world.coins.push(Coin::new(1.0, 1.2, 5.0, 0.0));
        world.powerups.push(PowerUp::new(2, 25.0, PowerUpKind::Jetpack, 0.0));
        let order: Vec<f32> = world.sorted_objects().iter().map(|o| o.sort_z()).collect();
        assert_eq!(order, vec![30.0, 25.0, 20.0, 5.0]);
    }

    #[test]
    fn test_difficulty_never_decreases() {
        let tuning = Tuning::default();
        let mut world = WorldGenerator::new(9);
        let mut last = world.difficulty;
        for _ in 0..2000 {
            world.update(180.0, 0.05, &tuning);
            assert!(world.difficulty >= last);
            last = world.difficulty;
        }
        assert!(world.difficulty > 1.0);
    }

    proptest! {
        #[test]
        fn every_pattern_leaves_a_lane_open(seed in any::<u64>(), steps in 1usize..60) {
            let tuning = Tuning::default();
            let mut world = WorldGenerator::new(seed);
            let mut z = INITIAL_SPAWN_Z;
            for _ in 0..steps {
                if let Some(record) = world.spawn_pattern(z, &tuning) {
                    let open = (0..LANE_COUNT).any(|lane| !lane_blocked(&world, lane, record.span));
                    prop_assert!(open, "pattern {:?} blocked all lanes", record.pattern);
                }
                // Tight gaps force overlapping patterns
                z += 6.0;
            }
        }

        #[test]
        fn scroll_moves_every_entity_by_step(seed in any::<u64>(), speed in 10.0f32..200.0, dt in 0.001f32..0.05) {
            let tuning = Tuning::default();
            let mut world = WorldGenerator::new(seed);
            world.update(speed, 0.016, &tuning);
            let before = depths(&world);
            let cursor = world.next_spawn_z;
            world.scroll(speed * dt);
            let after = depths(&world);
            for (kind, (old, new)) in before.iter().zip(&after).enumerate() {
                prop_assert_eq!(old.len(), new.len());
                for ((z, _), (moved, _)) in old.iter().zip(new) {
                    prop_assert!((z - moved - speed * dt).abs() < 1e-3, "kind {} moved {} -> {}", kind, z, moved);
                }
            }
            prop_assert!(world.next_spawn_z < cursor);
        }

        #[test]
        fn update_moves_survivors_by_speed_dt(
            seed in any::<u64>(),
            warmup in 0usize..200,
            speed in 10.0f32..200.0,
            dt in 0.001f32..0.05,
        ) {
            let tuning = Tuning::default();
            let mut world = WorldGenerator::new(seed);
            for _ in 0..warmup {
                world.update(180.0, 0.05, &tuning);
            }
            let before = depths(&world);
            let step = speed * dt;
            world.update(speed, dt, &tuning);
            let after = depths(&world);

            let cutoffs = [TRAIN_CLEANUP_Z, ENTITY_CLEANUP_Z, ENTITY_CLEANUP_Z, ENTITY_CLEANUP_Z];
            for (kind, ((old, new), cutoff)) in before.iter().zip(&after).zip(cutoffs).enumerate() {
                // Cleanup keeps order and spawns append, so survivors lead the list
                let survivors: Vec<f32> = old
                    .iter()
                    .filter(|(z, extent)| (z - step) + extent > cutoff)
                    .map(|(z, _)| z - step)
                    .collect();
                prop_assert!(new.len() >= survivors.len());
                for (expected, (moved, _)) in survivors.iter().zip(new) {
                    prop_assert!((expected - moved).abs() < 1e-3, "kind {} expected {} got {}", kind, expected, moved);
                }
            }
        }
    }
}
