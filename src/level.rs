use glam::Vec3;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::collectible::Collectible;
use crate::collision::CollisionWorld;
use crate::config::*;

/// Where a theme scatters its collectibles.
pub enum SpawnLayout {
    /// Deterministic ring: one angle slot per item, radius jittered within
    /// `spread` past `min_radius`.
    Ring { min_radius: f32, spread: f32 },
    /// Named clear regions with jittered sampling inside each.
    SafeZones(Vec<SpawnZone>),
}

pub struct SpawnZone {
    pub x: f32,
    pub z: f32,
    pub y: f32,
    pub radius: f32,
}

/// Everything that distinguishes one level from another. The `Level` type
/// itself is theme-agnostic; forest/village/desert/mountain are just
/// descriptors over the same contract.
pub struct LevelTheme {
    pub name: &'static str,
    pub total_items: usize,
    /// `Some` selects the countdown timer with game-over on expiry;
    /// `None` selects the unbounded count-up used purely for display.
    pub time_limit: Option<u32>,
    pub boundary_size: f32,
    /// Nominal ground height for the player's snap fallback. Themes built
    /// from platforms over a drop leave this `None` and rely on
    /// `death_floor` instead.
    pub ground_plane: Option<f32>,
    pub death_floor: Option<f32>,
    pub spawn_layout: SpawnLayout,
    pub generate_geometry: fn(&mut SmallRng, &mut CollisionWorld),
}

/// One playthrough of one theme: static collision geometry plus the live
/// collectible set. Constructed empty, populated by `load`, used every
/// frame while active, and torn down exactly once by `dispose`.
pub struct Level {
    theme: LevelTheme,
    world: CollisionWorld,
    collectibles: Vec<Collectible>,
    items_collected: usize,
    disposed: bool,
}

impl Level {
    pub fn new(theme: LevelTheme) -> Self {
        Self {
            theme,
            world: CollisionWorld::new(),
            collectibles: Vec::new(),
            items_collected: 0,
            disposed: false,
        }
    }

    /// Populate geometry and collectibles. Seeded so a given level layout
    /// is reproducible.
    pub fn load(&mut self, seed: u64) {
        let mut rng = SmallRng::seed_from_u64(seed);
        (self.theme.generate_geometry)(&mut rng, &mut self.world);
        self.spawn_collectibles(&mut rng);
        log::info!(
            "{}: loaded {} colliders, {} collectibles",
            self.theme.name,
            self.world.len(),
            self.collectibles.len()
        );
    }

    fn spawn_collectibles(&mut self, rng: &mut SmallRng) {
        let total = self.theme.total_items;
        match &self.theme.spawn_layout {
            SpawnLayout::Ring { min_radius, spread } => {
                for i in 0..total {
                    let angle = (i as f32 / total as f32) * std::f32::consts::TAU;
                    let radius = min_radius + rng.random_range(0.0..*spread);
                    let ground = self.theme.ground_plane.unwrap_or(0.0);
                    let candidate = Vec3::new(
                        angle.cos() * radius,
                        ground + COLLECTIBLE_HEIGHT,
                        angle.sin() * radius,
                    );
                    let position = self.clear_of_obstacles(candidate, rng);
                    self.collectibles.push(Collectible::new(position, rng));
                }
            }
            SpawnLayout::SafeZones(zones) => {
                // A theme listing more zones than items is a configuration
                // slip, not an error: extra zones are simply unused. Fewer
                // zones than items cycles through them with fresh jitter.
                let picks: Vec<Vec3> = zones
                    .iter()
                    .cycle()
                    .take(total)
                    .map(|zone| {
                        let angle = rng.random_range(0.0..std::f32::consts::TAU);
                        let dist = rng.random_range(0.0..zone.radius);
                        let mut x = zone.x + angle.cos() * dist;
                        let mut z = zone.z + angle.sin() * dist;
                        // Keep the player's spawn clearing empty.
                        if x.abs() < 10.0 && z.abs() < 10.0 {
                            x *= 1.5;
                            z *= 1.5;
                        }
                        Vec3::new(x, zone.y + COLLECTIBLE_HEIGHT, z)
                    })
                    .collect();
                for candidate in picks {
                    let position = self.clear_of_obstacles(candidate, rng);
                    self.collectibles.push(Collectible::new(position, rng));
                }
            }
        }
    }

    /// Collectibles must stay reachable: candidates overlapping an obstacle
    /// footprint (plus margin) are re-sampled around the same spot, then
    /// pushed straight out of the offending box if sampling keeps failing.
    fn clear_of_obstacles(&self, candidate: Vec3, rng: &mut SmallRng) -> Vec3 {
        let clearance = PICKUP_RADIUS * 0.5 + SPAWN_OBSTACLE_MARGIN;
        let blocked = |p: Vec3| {
            self.world
                .obstacles()
                .any(|c| c.aabb.footprint_distance(p) < clearance)
        };

        if !blocked(candidate) {
            return candidate;
        }

        for _ in 0..SPAWN_REJECT_ATTEMPTS {
            let jitter = Vec3::new(
                rng.random_range(-4.0..4.0),
                0.0,
                rng.random_range(-4.0..4.0),
            );
            let shifted = candidate + jitter;
            if !blocked(shifted) {
                return shifted;
            }
        }

        // Sampling failed; step out of whichever box is nearest, through
        // its closest face, until every footprint is clear. The bound
        // covers a chain of adjacent boxes shoving the point along.
        let mut out = candidate;
        for _ in 0..SPAWN_REJECT_ATTEMPTS {
            let Some(worst) = self.world.obstacles().min_by(|a, b| {
                a.aabb
                    .footprint_distance(out)
                    .total_cmp(&b.aabb.footprint_distance(out))
            }) else {
                break;
            };
            if worst.aabb.footprint_distance(out) >= clearance {
                break;
            }
            out = worst.aabb.footprint_escape(out, clearance + 0.01);
        }
        out
    }

    /// Advance idle spin/bob and in-flight collect animations, dropping
    /// collectibles whose collect animation has finished.
    pub fn update(&mut self, dt: f32) {
        if self.disposed {
            return;
        }
        for collectible in &mut self.collectibles {
            collectible.update(dt);
        }
        self.collectibles.retain(|c| !c.is_done());
    }

    /// Collect every live item within pickup range. Idempotent per
    /// collectible; returns how many were collected this call.
    pub fn check_collisions(&mut self, player_pos: Vec3) -> usize {
        if self.disposed {
            return 0;
        }
        let mut collected = 0;
        for collectible in &mut self.collectibles {
            if collectible.contains(player_pos) && collectible.collect() {
                collected += 1;
            }
        }
        self.items_collected += collected;
        collected
    }

    /// Pure query: outside the horizontal play area (strictly beyond the
    /// boundary — sitting exactly on it is fine), or below the fall
    /// threshold in themes that have one.
    pub fn check_boundary_violation(&self, player_pos: Vec3) -> bool {
        let bounds = self.theme.boundary_size;
        if player_pos.x.abs() > bounds || player_pos.z.abs() > bounds {
            return true;
        }
        matches!(self.theme.death_floor, Some(floor) if player_pos.y < floor)
    }

    /// Release geometry and collectibles, cancelling any in-flight collect
    /// animations. The instance is not reusable afterwards.
    pub fn dispose(&mut self) {
        self.collectibles.clear();
        self.world = CollisionWorld::new();
        self.disposed = true;
        log::info!("{} disposed", self.theme.name);
    }

    pub fn is_complete(&self) -> bool {
        self.items_collected >= self.theme.total_items
    }

    pub fn items_collected(&self) -> usize {
        self.items_collected
    }

    pub fn total_items(&self) -> usize {
        self.theme.total_items
    }

    pub fn name(&self) -> &'static str {
        self.theme.name
    }

    pub fn time_limit(&self) -> Option<u32> {
        self.theme.time_limit
    }

    pub fn ground_plane(&self) -> Option<f32> {
        self.theme.ground_plane
    }

    pub fn world(&self) -> &CollisionWorld {
        &self.world
    }

    pub fn collectibles(&self) -> &[Collectible] {
        &self.collectibles
    }
}
