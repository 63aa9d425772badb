// Player dimensions and physics
pub const PLAYER_RADIUS: f32 = 0.5; // collision sphere radius
pub const EYE_HEIGHT: f32 = 1.6; // camera rig origin above the feet
pub const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_3; // 60 degrees up/down

// Movement
pub const MOVE_SPEED: f32 = 5.0;
pub const SPRINT_SPEED: f32 = 8.0;
pub const JUMP_FORCE: f32 = 12.0;
pub const GRAVITY: f32 = 30.0;
pub const JUMP_COOLDOWN: f32 = 0.3; // seconds between jumps
pub const HORIZONTAL_DAMPING: f32 = 10.0; // exponential decay rate, 1/s
pub const MOUSE_SENSITIVITY: f32 = 0.002;
pub const MAX_FRAME_DT: f32 = 0.1; // clamp to avoid physics explosions on hitches

// Collision
pub const GROUND_NORMAL_MIN_Y: f32 = 0.7; // separation normals steeper than this ground us
pub const GROUND_SNAP_EPSILON: f32 = 0.1; // tolerance for the nominal ground plane snap
pub const GROUND_CONTACT_SKIN: f32 = 0.05; // resting-contact tolerance for box grounding

// Collectibles
pub const PICKUP_RADIUS: f32 = 2.0;
pub const COLLECT_ANIM_SECS: f32 = 0.5; // shrink/fade duration after pickup
pub const COLLECTIBLE_HEIGHT: f32 = 1.5; // spawn height above the ground
pub const BOB_AMOUNT: f32 = 0.3;

// Level generation
pub const SPAWN_OBSTACLE_MARGIN: f32 = 0.8; // keep collectibles clear of obstacle footprints
pub const SPAWN_REJECT_ATTEMPTS: u32 = 16;

// Session
pub const GAME_OVER_MENU_DELAY: f32 = 2.0; // seconds before falling back to the menu
pub const TIME_WARNING_MAJOR: u32 = 30;
pub const TIME_WARNING_FINAL: u32 = 10;
