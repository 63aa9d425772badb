use glam::Vec3;

use crate::config::*;

/// World-space axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box centered at `center` with full extents `size`.
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        p.clamp(self.min, self.max)
    }

    /// A box with no volume on some axis cannot produce a separation
    /// normal worth responding to.
    pub fn is_degenerate(&self) -> bool {
        self.max.x <= self.min.x || self.max.y <= self.min.y || self.max.z <= self.min.z
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Horizontal (XZ) distance from a point to the box footprint.
    pub fn footprint_distance(&self, p: Vec3) -> f32 {
        let dx = (self.min.x - p.x).max(0.0).max(p.x - self.max.x);
        let dz = (self.min.z - p.z).max(0.0).max(p.z - self.max.z);
        (dx * dx + dz * dz).sqrt()
    }

    /// Move `p` out of the box footprint to `clearance` past the nearest
    /// face, along whichever XZ axis is the shortest way out. Works from
    /// anywhere, including deep inside the box; y is untouched.
    pub fn footprint_escape(&self, p: Vec3, clearance: f32) -> Vec3 {
        let to_min_x = p.x - (self.min.x - clearance);
        let to_max_x = (self.max.x + clearance) - p.x;
        let to_min_z = p.z - (self.min.z - clearance);
        let to_max_z = (self.max.z + clearance) - p.z;

        let mut out = p;
        if to_min_x <= to_max_x && to_min_x <= to_min_z && to_min_x <= to_max_z {
            out.x = self.min.x - clearance;
        } else if to_max_x <= to_min_z && to_max_x <= to_max_z {
            out.x = self.max.x + clearance;
        } else if to_min_z <= to_max_z {
            out.z = self.min.z - clearance;
        } else {
            out.z = self.max.z + clearance;
        }
        out
    }
}

/// What a collidable is, decided at construction time. Collision response
/// switches on this explicitly instead of inspecting dynamic tags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderKind {
    Ground,
    Obstacle,
    Decoration,
    Bridge { slippery: bool },
}

impl ColliderKind {
    pub fn is_solid(&self) -> bool {
        !matches!(self, ColliderKind::Decoration)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Collider {
    pub aabb: Aabb,
    pub kind: ColliderKind,
}

impl Collider {
    pub fn new(aabb: Aabb, kind: ColliderKind) -> Self {
        Self { aabb, kind }
    }
}

/// Outcome of pushing the player sphere out of the static geometry.
#[derive(Debug, Clone, Copy)]
pub struct Resolution {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Set when some separation normal was steep enough to stand on.
    pub grounded_on: Option<ColliderKind>,
}

/// Static collision geometry for one level. Built during `Level::load`,
/// read-only afterwards; the player controller never mutates it.
#[derive(Debug, Default)]
pub struct CollisionWorld {
    colliders: Vec<Collider>,
}

impl CollisionWorld {
    pub fn new() -> Self {
        Self {
            colliders: Vec::new(),
        }
    }

    pub fn push(&mut self, collider: Collider) {
        self.colliders.push(collider);
    }

    pub fn colliders(&self) -> &[Collider] {
        &self.colliders
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Obstacle footprints, used by spawn placement to keep collectibles
    /// reachable.
    pub fn obstacles(&self) -> impl Iterator<Item = &Collider> {
        self.colliders
            .iter()
            .filter(|c| matches!(c.kind, ColliderKind::Obstacle))
    }

    /// Resolve the player sphere against every solid box: find the closest
    /// point on the box to the sphere center, and if the center is within
    /// the radius, push out along the separation normal by the penetration
    /// depth. The velocity component along an opposing normal is zeroed so
    /// the player does not keep sinking into geometry.
    pub fn resolve_sphere(&self, center: Vec3, radius: f32, velocity: Vec3) -> Resolution {
        let mut position = center;
        let mut velocity = velocity;
        let mut grounded_on = None;

        for collider in &self.colliders {
            if !collider.kind.is_solid() {
                continue;
            }
            // Degenerate boxes are skipped defensively rather than raising.
            if collider.aabb.is_degenerate() {
                continue;
            }

            let closest = collider.aabb.closest_point(position);
            let offset = position - closest;
            let distance = offset.length();
            // The skin keeps resting contact stable: a sphere sitting
            // exactly at the surface still counts as grounded instead of
            // flickering between contact and free fall every other frame.
            if distance >= radius + GROUND_CONTACT_SKIN {
                continue;
            }

            let normal = if distance > 1e-6 {
                offset / distance
            } else {
                // Sphere center exactly inside the box: no usable normal,
                // eject straight up.
                Vec3::Y
            };

            if distance < radius {
                position += normal * (radius - distance);
                let into = velocity.dot(normal);
                if into < 0.0 {
                    velocity -= normal * into;
                }
            }

            if normal.y > GROUND_NORMAL_MIN_Y {
                grounded_on = Some(collider.kind);
                velocity.y = velocity.y.max(0.0);
            }
        }

        Resolution {
            position,
            velocity,
            grounded_on,
        }
    }
}
