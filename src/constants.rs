// Window geometry (pixels)
pub const WIN_WIDTH: i32 = 500;
pub const WIN_HEIGHT: i32 = 800;
pub const FLOOR_Y: i32 = 730;

// Bird spawn point
pub const BIRD_START_X: i32 = 230;
pub const BIRD_START_Y: f64 = 350.0;

// Bird kinematics
pub const JUMP_VELOCITY: f64 = -10.5;
pub const GRAVITY_FACTOR: f64 = 1.5;
pub const TERMINAL_DISPLACEMENT: f64 = 16.0;
pub const ASCENT_BIAS: f64 = 2.0;
pub const TILT_MARGIN: f64 = 50.0;
pub const MAX_ROTATION: f64 = 25.0;
pub const MIN_ROTATION: f64 = -90.0;
pub const ROTATION_VELOCITY: f64 = 20.0;
pub const NOSE_DIVE_TILT: f64 = -80.0;
pub const ANIMATION_TIME: u32 = 5;

// Pipes
pub const PIPE_GAP: i32 = 200;
pub const PIPE_VELOCITY: i32 = 5;
pub const PIPE_HEIGHT_MIN: i32 = 50;
pub const PIPE_HEIGHT_MAX: i32 = 450;
pub const PIPE_SPAWN_MIN_X: i32 = 450;
pub const PIPE_SPAWN_MAX_X: i32 = 600;
pub const PIPE_FIXED_SPAWN_X: i32 = 600;

// Floor
pub const BASE_VELOCITY: i32 = 5;

// Sprite dimensions (artwork scaled 2x)
pub const BIRD_SPRITE_WIDTH: u32 = 68;
pub const BIRD_SPRITE_HEIGHT: u32 = 48;
pub const PIPE_SPRITE_WIDTH: u32 = 104;
pub const PIPE_SPRITE_HEIGHT: u32 = 640;
pub const BASE_SPRITE_WIDTH: i32 = 672;

// Fitness shaping
pub const SURVIVAL_REWARD: f64 = 0.1;
pub const PIPE_REWARD: f64 = 5.0;
pub const COLLISION_PENALTY: f64 = 1.0;
pub const JUMP_THRESHOLD: f64 = 0.5;

// Evaluation limits
pub const BREAK_SCORE: u32 = 50;

// Frame pacing
pub const SOLO_FPS: u32 = 15;
pub const TRAINING_FPS: u32 = 120;

// Genome store
pub const GENOME_VERSION_MAGIC: u64 = 0x464C_4150_4E45_5400; // "FLAPNET\0" in hex
pub const GENOME_FILE_NAME: &str = "winner-genome.dat";
pub const CONFIG_FILE_NAME: &str = "flapper.json";
pub const LOG_FILE_NAME: &str = "flapper.log";
