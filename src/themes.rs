//! The built-in campaign. Each theme is pure data plus a geometry
//! generator; nothing here knows about scoring or timers.

use glam::Vec3;
use rand::Rng;
use rand::rngs::SmallRng;

use crate::collision::{Aabb, Collider, ColliderKind, CollisionWorld};
use crate::level::{LevelTheme, SpawnLayout, SpawnZone};

/// Ordered level list. Index 0 is the starting level.
pub fn campaign() -> Vec<LevelTheme> {
    vec![forest(), village(), desert_ruins(), mountain()]
}

pub fn theme_count() -> usize {
    4
}

fn forest() -> LevelTheme {
    LevelTheme {
        name: "Whispering Forest",
        total_items: 5,
        time_limit: Some(60),
        boundary_size: 45.0,
        ground_plane: Some(0.0),
        death_floor: None,
        spawn_layout: SpawnLayout::Ring {
            min_radius: 12.0,
            spread: 22.0,
        },
        generate_geometry: forest_geometry,
    }
}

fn village() -> LevelTheme {
    LevelTheme {
        name: "Abandoned Village",
        total_items: 8,
        time_limit: None,
        boundary_size: 55.0,
        ground_plane: Some(0.0),
        death_floor: None,
        spawn_layout: SpawnLayout::Ring {
            min_radius: 14.0,
            spread: 28.0,
        },
        generate_geometry: village_geometry,
    }
}

fn desert_ruins() -> LevelTheme {
    LevelTheme {
        name: "Desert Ruins",
        total_items: 8,
        time_limit: Some(140),
        boundary_size: 75.0,
        ground_plane: Some(0.0),
        death_floor: Some(-10.0),
        spawn_layout: SpawnLayout::SafeZones(vec![
            SpawnZone { x: 30.0, z: 20.0, y: 0.0, radius: 8.0 },
            SpawnZone { x: -35.0, z: 25.0, y: 0.0, radius: 8.0 },
            SpawnZone { x: 40.0, z: -30.0, y: 0.0, radius: 8.0 },
            SpawnZone { x: -28.0, z: -38.0, y: 0.0, radius: 8.0 },
            SpawnZone { x: 55.0, z: 5.0, y: 0.0, radius: 8.0 },
            SpawnZone { x: -55.0, z: -10.0, y: 0.0, radius: 8.0 },
            SpawnZone { x: 10.0, z: 50.0, y: 0.0, radius: 8.0 },
            SpawnZone { x: -12.0, z: -55.0, y: 0.0, radius: 8.0 },
        ]),
        generate_geometry: desert_geometry,
    }
}

/// Platform course over a drop. Positions are shared between the geometry
/// generator and the spawn zones so every collectible sits on a surface
/// the player can actually reach.
const MOUNTAIN_PLATFORMS: &[(f32, f32, f32, f32, f32)] = &[
    // (x, z, top_y, width, depth)
    (18.0, 0.0, 1.5, 8.0, 8.0),
    (32.0, 10.0, 3.0, 7.0, 7.0),
    (40.0, 26.0, 4.5, 7.0, 7.0),
    (28.0, 42.0, 6.0, 6.0, 6.0),
    (8.0, 50.0, 7.5, 6.0, 6.0),
    (-14.0, 46.0, 9.0, 6.0, 6.0),
    (-30.0, 32.0, 10.5, 6.0, 6.0),
    (-38.0, 12.0, 12.0, 6.0, 6.0),
    (-34.0, -12.0, 13.5, 6.0, 6.0),
    (-20.0, -32.0, 15.0, 6.0, 6.0),
    (2.0, -44.0, 16.5, 6.0, 6.0),
    (24.0, -40.0, 18.0, 8.0, 8.0),
];

fn mountain() -> LevelTheme {
    let zones = MOUNTAIN_PLATFORMS
        .iter()
        .map(|&(x, z, top, w, d)| SpawnZone {
            x,
            z,
            y: top,
            radius: (w.min(d) * 0.5 - 1.0).max(0.5),
        })
        .collect();
    LevelTheme {
        name: "Mountain Ascent",
        total_items: 12,
        time_limit: Some(180),
        boundary_size: 100.0,
        ground_plane: None,
        death_floor: Some(-15.0),
        spawn_layout: SpawnLayout::SafeZones(zones),
        generate_geometry: mountain_geometry,
    }
}

// ---------------------------------------------------------------------------
// Geometry generators

fn ground_slab(world: &mut CollisionWorld, half_extent: f32, top_y: f32) {
    world.push(Collider::new(
        Aabb::new(
            Vec3::new(-half_extent, top_y - 2.0, -half_extent),
            Vec3::new(half_extent, top_y, half_extent),
        ),
        ColliderKind::Ground,
    ));
}

/// Four thin walls well past the boundary line. Crossing the line already
/// ends the run; the walls are a backstop for anything that tunnels.
fn boundary_walls(world: &mut CollisionWorld, boundary: f32) {
    let b = boundary + 2.0;
    let walls = [
        Aabb::new(Vec3::new(-b, 0.0, b - 0.5), Vec3::new(b, 20.0, b + 0.5)),
        Aabb::new(Vec3::new(-b, 0.0, -b - 0.5), Vec3::new(b, 20.0, -b + 0.5)),
        Aabb::new(Vec3::new(b - 0.5, 0.0, -b), Vec3::new(b + 0.5, 20.0, b)),
        Aabb::new(Vec3::new(-b - 0.5, 0.0, -b), Vec3::new(-b + 0.5, 20.0, b)),
    ];
    for aabb in walls {
        world.push(Collider::new(aabb, ColliderKind::Obstacle));
    }
}

/// Scatter `count` axis-aligned obstacle boxes within `range`, keeping a
/// clearing around the player spawn at the origin.
fn scatter_obstacles(
    rng: &mut SmallRng,
    world: &mut CollisionWorld,
    count: usize,
    range: f32,
    size_min: Vec3,
    size_max: Vec3,
) {
    for _ in 0..count {
        let x = rng.random_range(-range..range);
        let z = rng.random_range(-range..range);
        if x.abs() < 8.0 && z.abs() < 8.0 {
            continue;
        }
        let size = Vec3::new(
            rng.random_range(size_min.x..size_max.x),
            rng.random_range(size_min.y..size_max.y),
            rng.random_range(size_min.z..size_max.z),
        );
        world.push(Collider::new(
            Aabb::from_center_size(Vec3::new(x, size.y * 0.5, z), size),
            ColliderKind::Obstacle,
        ));
    }
}

fn forest_geometry(rng: &mut SmallRng, world: &mut CollisionWorld) {
    boundary_walls(world, 45.0);
    // Tree trunks.
    scatter_obstacles(
        rng,
        world,
        40,
        40.0,
        Vec3::new(0.5, 3.0, 0.5),
        Vec3::new(0.8, 6.0, 0.8),
    );
    // Boulders.
    scatter_obstacles(
        rng,
        world,
        10,
        38.0,
        Vec3::new(1.0, 0.8, 1.0),
        Vec3::new(2.5, 1.8, 2.5),
    );
    // Undergrowth the player walks through.
    for _ in 0..20 {
        let x = rng.random_range(-40.0..40.0);
        let z = rng.random_range(-40.0..40.0);
        world.push(Collider::new(
            Aabb::from_center_size(Vec3::new(x, 0.4, z), Vec3::new(1.2, 0.8, 1.2)),
            ColliderKind::Decoration,
        ));
    }
}

fn village_geometry(rng: &mut SmallRng, world: &mut CollisionWorld) {
    boundary_walls(world, 55.0);
    // Houses.
    scatter_obstacles(
        rng,
        world,
        14,
        46.0,
        Vec3::new(4.0, 3.5, 4.0),
        Vec3::new(7.0, 6.0, 7.0),
    );
    // Carts, fences, market stalls.
    scatter_obstacles(
        rng,
        world,
        12,
        48.0,
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(2.5, 2.0, 2.5),
    );
    // The village well at the square.
    world.push(Collider::new(
        Aabb::from_center_size(Vec3::new(9.0, 0.6, 9.0), Vec3::new(2.0, 1.2, 2.0)),
        ColliderKind::Obstacle,
    ));
}

fn desert_geometry(rng: &mut SmallRng, world: &mut CollisionWorld) {
    boundary_walls(world, 75.0);
    // Collapsed temple walls.
    scatter_obstacles(
        rng,
        world,
        10,
        65.0,
        Vec3::new(6.0, 2.0, 1.5),
        Vec3::new(12.0, 4.5, 2.5),
    );
    // Standing pillars.
    scatter_obstacles(
        rng,
        world,
        18,
        68.0,
        Vec3::new(1.2, 4.0, 1.2),
        Vec3::new(2.0, 8.0, 2.0),
    );
    // Rubble that reads as scenery but does not block.
    for _ in 0..16 {
        let x = rng.random_range(-70.0..70.0);
        let z = rng.random_range(-70.0..70.0);
        world.push(Collider::new(
            Aabb::from_center_size(Vec3::new(x, 0.3, z), Vec3::new(1.5, 0.6, 1.5)),
            ColliderKind::Decoration,
        ));
    }
}

fn mountain_geometry(_rng: &mut SmallRng, world: &mut CollisionWorld) {
    // Base ledge around the spawn; step off its edge and you fall.
    ground_slab(world, 14.0, 0.0);

    for &(x, z, top, w, d) in MOUNTAIN_PLATFORMS {
        world.push(Collider::new(
            Aabb::new(
                Vec3::new(x - w * 0.5, top - 2.0, z - d * 0.5),
                Vec3::new(x + w * 0.5, top, z + d * 0.5),
            ),
            ColliderKind::Ground,
        ));
    }

    // Iced rope bridge from the spawn ledge to the first platform.
    world.push(Collider::new(
        Aabb::new(Vec3::new(13.0, 0.6, -1.5), Vec3::new(15.0, 1.5, 1.5)),
        ColliderKind::Bridge { slippery: true },
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn campaign_has_four_levels_in_order() {
        let themes = campaign();
        assert_eq!(themes.len(), theme_count());
        let names: Vec<_> = themes.iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            [
                "Whispering Forest",
                "Abandoned Village",
                "Desert Ruins",
                "Mountain Ascent"
            ]
        );
    }

    #[test]
    fn only_village_runs_without_a_clock() {
        let themes = campaign();
        let unbounded: Vec<_> = themes
            .iter()
            .filter(|t| t.time_limit.is_none())
            .map(|t| t.name)
            .collect();
        assert_eq!(unbounded, ["Abandoned Village"]);
    }

    #[test]
    fn geometry_stays_inside_the_boundary_fence() {
        let mut rng = SmallRng::seed_from_u64(42);
        for theme in campaign() {
            let mut world = CollisionWorld::new();
            (theme.generate_geometry)(&mut rng, &mut world);
            let fence = theme.boundary_size + 3.0;
            for c in world.colliders() {
                assert!(c.aabb.min.x >= -fence && c.aabb.max.x <= fence, "{}", theme.name);
                assert!(c.aabb.min.z >= -fence && c.aabb.max.z <= fence, "{}", theme.name);
            }
        }
    }

    #[test]
    fn obstacles_leave_the_spawn_clearing_open() {
        let mut rng = SmallRng::seed_from_u64(9);
        for theme in campaign() {
            let mut world = CollisionWorld::new();
            (theme.generate_geometry)(&mut rng, &mut world);
            for c in world.obstacles() {
                assert!(
                    c.aabb.footprint_distance(Vec3::new(0.0, 1.6, 0.0)) > 1.0,
                    "{} blocks the player spawn",
                    theme.name
                );
            }
        }
    }

    #[test]
    fn mountain_platforms_match_their_spawn_zones() {
        let theme = mountain();
        let mut world = CollisionWorld::new();
        let mut rng = SmallRng::seed_from_u64(1);
        (theme.generate_geometry)(&mut rng, &mut world);

        let SpawnLayout::SafeZones(zones) = &theme.spawn_layout else {
            panic!("mountain uses safe zones");
        };
        for zone in zones {
            let supported = world.colliders().iter().any(|c| {
                matches!(c.kind, ColliderKind::Ground)
                    && (c.aabb.max.y - zone.y).abs() < 1e-3
                    && zone.x >= c.aabb.min.x
                    && zone.x <= c.aabb.max.x
                    && zone.z >= c.aabb.min.z
                    && zone.z <= c.aabb.max.z
            });
            assert!(supported, "zone at ({}, {}) floats in the air", zone.x, zone.z);
        }
    }
}
