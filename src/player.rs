use glam::Vec3;

use crate::collision::{ColliderKind, CollisionWorld};
use crate::config::*;
use crate::input::MoveInput;

/// First-person movement and collision controller.
///
/// `position` is the camera rig origin: the center of the collision sphere,
/// `EYE_HEIGHT` above the feet. Horizontal motion comes straight from the
/// move flags each frame; `velocity` carries the vertical component plus
/// whatever residual the collision response leaves, and its horizontal part
/// decays exponentially rather than snapping to zero.
pub struct Player {
    pub position: Vec3,
    pub velocity: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub on_ground: bool,
    pub can_jump: bool,
    pub is_active: bool,
    time_since_jump: f32,
    on_slippery: bool,
    sprinting: bool,
    walking: bool,
    walk_cycle: f32,
}

impl Player {
    pub fn new(spawn: Vec3) -> Self {
        Self {
            position: spawn,
            velocity: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            on_ground: true,
            can_jump: true,
            is_active: false,
            time_since_jump: JUMP_COOLDOWN,
            on_slippery: false,
            sprinting: false,
            walking: false,
            walk_cycle: 0.0,
        }
    }

    /// Mouse-look accumulation. Yaw turns the whole body (and with it the
    /// movement basis); pitch only tilts the camera and never affects where
    /// the player walks.
    pub fn look(&mut self, dx: f32, dy: f32) {
        if !self.is_active {
            return;
        }
        self.yaw += dx * MOUSE_SENSITIVITY;
        self.pitch = (self.pitch - dy * MOUSE_SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// One physics step. `ground_plane` is the level's nominal ground height
    /// (if it has one) used as the snap fallback when box grounding misses.
    pub fn update(
        &mut self,
        dt: f32,
        input: &MoveInput,
        world: &CollisionWorld,
        ground_plane: Option<f32>,
    ) {
        if !self.is_active {
            return;
        }
        let dt = dt.min(MAX_FRAME_DT);

        // Jump cooldown; prevents jump-spam off repeated ground micro-snaps.
        self.time_since_jump += dt;
        if self.time_since_jump > JUMP_COOLDOWN {
            self.can_jump = true;
        }

        if !self.on_ground {
            self.velocity.y -= GRAVITY * dt;
        }

        // Exponential horizontal damping; a slippery bridge underfoot damps
        // half as fast so momentum carries.
        let rate = if self.on_slippery {
            HORIZONTAL_DAMPING * 0.5
        } else {
            HORIZONTAL_DAMPING
        };
        let damping = (-rate * dt).exp();
        self.velocity.x *= damping;
        self.velocity.z *= damping;

        // Input direction, normalized so diagonals are not faster.
        self.sprinting = input.sprint;
        self.walking = input.any_direction();
        let local = Vec3::new(
            (input.right as i32 - input.left as i32) as f32,
            0.0,
            (input.forward as i32 - input.backward as i32) as f32,
        )
        .normalize_or_zero();

        let (sin, cos) = (self.yaw.sin(), self.yaw.cos());
        let forward = Vec3::new(sin, 0.0, -cos);
        let right = Vec3::new(cos, 0.0, sin);
        let speed = if self.sprinting { SPRINT_SPEED } else { MOVE_SPEED };

        self.position += (forward * local.z + right * local.x) * speed * dt;
        self.position.y += self.velocity.y * dt;

        // Push out of static geometry.
        let resolution = world.resolve_sphere(self.position, PLAYER_RADIUS, self.velocity);
        self.position = resolution.position;
        self.velocity = resolution.velocity;

        let box_grounded = resolution.grounded_on.is_some();
        if box_grounded {
            self.on_ground = true;
            self.on_slippery = matches!(
                resolution.grounded_on,
                Some(ColliderKind::Bridge { slippery: true })
            );
        }

        // Ground snap fallback: the approximate box collision can miss, so
        // levels with a nominal ground plane force the player back onto it.
        // Never while ascending: at high frame rates the first jump frame
        // moves less than the snap tolerance and would be swallowed.
        match ground_plane {
            Some(ground_y) => {
                let feet = self.position.y - EYE_HEIGHT;
                if self.velocity.y <= 0.0 && feet <= ground_y + GROUND_SNAP_EPSILON {
                    self.position.y = ground_y + EYE_HEIGHT;
                    self.velocity.y = self.velocity.y.min(0.0);
                    self.on_ground = true;
                    self.can_jump = self.time_since_jump > JUMP_COOLDOWN;
                    self.on_slippery = false;
                } else if !box_grounded {
                    self.on_ground = false;
                }
            }
            None => {
                // No safety net: box contact is the only ground there is.
                self.on_ground = box_grounded;
                if !box_grounded {
                    self.on_slippery = false;
                }
            }
        }

        self.update_animation(dt);
    }

    /// Edge-triggered from the jump key. No double-jump; the cooldown keeps
    /// repeated ground micro-snaps from turning held-space into a pogo.
    pub fn jump(&mut self) {
        if self.on_ground && self.can_jump && self.is_active {
            log::debug!("jump, force {JUMP_FORCE}");
            self.velocity.y = JUMP_FORCE;
            self.on_ground = false;
            self.can_jump = false;
            self.time_since_jump = 0.0;
        }
    }

    // Pose cycling for the walk animation. Purely cosmetic; consumers read
    // `walk_cycle` to swing limbs, the returned position/rotation are never
    // influenced by it.
    fn update_animation(&mut self, dt: f32) {
        if self.walking {
            let anim_speed = if self.sprinting { 18.0 } else { 12.0 };
            self.walk_cycle += dt * anim_speed;
        } else {
            self.walk_cycle = 0.0;
        }
    }

    pub fn walk_cycle(&self) -> f32 {
        self.walk_cycle
    }

    pub fn feet_y(&self) -> f32 {
        self.position.y - EYE_HEIGHT
    }

    /// Back to the spawn transform, jump re-armed. Called on level load.
    pub fn reset(&mut self, spawn: Vec3) {
        self.position = spawn;
        self.velocity = Vec3::ZERO;
        self.yaw = 0.0;
        self.pitch = 0.0;
        self.on_ground = true;
        self.can_jump = true;
        self.time_since_jump = JUMP_COOLDOWN;
        self.on_slippery = false;
        self.sprinting = false;
        self.walking = false;
        self.walk_cycle = 0.0;
        log::debug!("player reset to {spawn:?}");
    }

    /// Physics integration freezes entirely while inactive; input release
    /// and pointer-capture teardown happen at the call site.
    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{Aabb, Collider};

    const FRAME: f32 = 1.0 / 60.0;

    fn grounded_player() -> Player {
        let mut player = Player::new(Vec3::new(0.0, EYE_HEIGHT, 0.0));
        player.set_active(true);
        player
    }

    fn forward_input() -> MoveInput {
        MoveInput {
            forward: true,
            ..Default::default()
        }
    }

    #[test]
    fn horizontal_velocity_decays_monotonically() {
        let world = CollisionWorld::new();
        let mut player = grounded_player();
        player.velocity = Vec3::new(4.0, 0.0, -3.0);

        let mut prev = player.velocity.with_y(0.0).length();
        // One second of zero input.
        for _ in 0..60 {
            player.update(FRAME, &MoveInput::default(), &world, Some(0.0));
            let mag = player.velocity.with_y(0.0).length();
            assert!(mag <= prev + 1e-6, "speed increased: {mag} > {prev}");
            prev = mag;
        }
        assert!(prev < 0.01, "should have decayed to rest, got {prev}");
    }

    #[test]
    fn gravity_pulls_airborne_player_down() {
        let world = CollisionWorld::new();
        let mut player = Player::new(Vec3::new(0.0, 20.0, 0.0));
        player.set_active(true);
        player.on_ground = false;

        player.update(FRAME, &MoveInput::default(), &world, None);
        assert!(player.velocity.y < 0.0);
    }

    #[test]
    fn jump_sets_velocity_and_leaves_ground() {
        let mut player = grounded_player();

        player.jump();

        assert_eq!(player.velocity.y, JUMP_FORCE);
        assert!(!player.on_ground);
        assert!(!player.can_jump);
    }

    #[test]
    fn jump_survives_high_frame_rates() {
        let world = CollisionWorld::new();
        let mut player = grounded_player();
        player.jump();

        // A 120 Hz frame moves less than the snap tolerance on the first
        // step; the snap must not re-ground an ascending player.
        let dt = 1.0 / 120.0;
        for _ in 0..12 {
            player.update(dt, &MoveInput::default(), &world, Some(0.0));
        }
        assert!(!player.on_ground, "re-grounded mid-jump");
        assert!(
            player.feet_y() > GROUND_SNAP_EPSILON,
            "jump cancelled by ground snap: feet={}",
            player.feet_y()
        );
        assert!(player.velocity.y > 0.0);
    }

    #[test]
    fn jump_is_refused_while_airborne_or_inactive() {
        let mut airborne = grounded_player();
        airborne.on_ground = false;
        airborne.jump();
        assert_eq!(airborne.velocity.y, 0.0);

        let mut inactive = Player::new(Vec3::new(0.0, EYE_HEIGHT, 0.0));
        inactive.jump();
        assert_eq!(inactive.velocity.y, 0.0);
    }

    #[test]
    fn jump_cooldown_blocks_respam() {
        let world = CollisionWorld::new();
        let mut player = grounded_player();

        player.jump();
        assert_eq!(player.velocity.y, JUMP_FORCE);

        // Force a landing immediately; cooldown has not elapsed yet.
        player.on_ground = true;
        player.velocity.y = 0.0;
        player.update(FRAME, &MoveInput::default(), &world, Some(0.0));
        player.jump();
        assert!(player.velocity.y <= 0.0, "cooldown should block the re-jump");

        // After the cooldown has elapsed the jump goes through again.
        for _ in 0..30 {
            player.update(FRAME, &MoveInput::default(), &world, Some(0.0));
        }
        player.jump();
        assert_eq!(player.velocity.y, JUMP_FORCE);
    }

    #[test]
    fn inactive_player_does_not_integrate() {
        let world = CollisionWorld::new();
        let mut player = Player::new(Vec3::new(1.0, EYE_HEIGHT, 2.0));
        player.set_active(false);
        player.velocity = Vec3::new(3.0, -1.0, 0.0);

        let before = player.position;
        player.update(FRAME, &forward_input(), &world, Some(0.0));
        assert_eq!(player.position, before);
        assert_eq!(player.velocity, Vec3::new(3.0, -1.0, 0.0));
    }

    #[test]
    fn pitch_is_clamped() {
        let mut player = grounded_player();
        player.look(0.0, -100_000.0);
        assert!(player.pitch <= PITCH_LIMIT + 1e-6);
        player.look(0.0, 100_000.0);
        assert!(player.pitch >= -PITCH_LIMIT - 1e-6);
    }

    #[test]
    fn pitch_does_not_change_movement_basis() {
        let world = CollisionWorld::new();
        let mut flat = grounded_player();
        let mut tilted = grounded_player();
        tilted.look(0.0, 5000.0); // look far down

        for _ in 0..30 {
            flat.update(FRAME, &forward_input(), &world, Some(0.0));
            tilted.update(FRAME, &forward_input(), &world, Some(0.0));
        }
        assert!((flat.position - tilted.position).length() < 1e-4);
    }

    #[test]
    fn diagonal_is_not_faster_than_axis() {
        let world = CollisionWorld::new();
        let mut straight = grounded_player();
        let mut diagonal = grounded_player();
        let diag_input = MoveInput {
            forward: true,
            right: true,
            ..Default::default()
        };

        for _ in 0..60 {
            straight.update(FRAME, &forward_input(), &world, Some(0.0));
            diagonal.update(FRAME, &diag_input, &world, Some(0.0));
        }

        let d_straight = straight.position.with_y(0.0).length();
        let d_diagonal = diagonal.position.with_y(0.0).length();
        assert!((d_straight - d_diagonal).abs() < 1e-3);
    }

    #[test]
    fn sprint_covers_more_ground() {
        let world = CollisionWorld::new();
        let mut walker = grounded_player();
        let mut sprinter = grounded_player();
        let sprint_input = MoveInput {
            forward: true,
            sprint: true,
            ..Default::default()
        };

        for _ in 0..60 {
            walker.update(FRAME, &forward_input(), &world, Some(0.0));
            sprinter.update(FRAME, &sprint_input, &world, Some(0.0));
        }
        assert!(sprinter.position.with_y(0.0).length() > walker.position.with_y(0.0).length());
    }

    #[test]
    fn wall_stops_forward_motion() {
        let mut world = CollisionWorld::new();
        // Wall across the -Z path, 2 units ahead.
        world.push(Collider::new(
            Aabb::new(Vec3::new(-5.0, 0.0, -3.0), Vec3::new(5.0, 4.0, -2.0)),
            ColliderKind::Obstacle,
        ));

        let mut player = grounded_player();
        for _ in 0..120 {
            player.update(FRAME, &forward_input(), &world, Some(0.0));
        }

        // Sphere surface rests against the wall face at z=-2.
        assert!(
            player.position.z >= -2.0 + PLAYER_RADIUS - 1e-3,
            "tunnelled to z={}",
            player.position.z
        );
    }

    #[test]
    fn ground_snap_catches_a_fall() {
        let world = CollisionWorld::new();
        let mut player = Player::new(Vec3::new(0.0, EYE_HEIGHT + 3.0, 0.0));
        player.set_active(true);
        player.on_ground = false;

        for _ in 0..120 {
            player.update(FRAME, &MoveInput::default(), &world, Some(0.0));
        }
        assert!((player.feet_y()).abs() < 1e-3);
        assert!(player.on_ground);
    }

    #[test]
    fn walk_cycle_advances_only_while_moving() {
        let world = CollisionWorld::new();
        let mut player = grounded_player();

        player.update(FRAME, &forward_input(), &world, Some(0.0));
        assert!(player.walk_cycle() > 0.0);

        player.update(FRAME, &MoveInput::default(), &world, Some(0.0));
        assert_eq!(player.walk_cycle(), 0.0);
    }
}
