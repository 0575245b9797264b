// Gameplay levers shared by the domain and the adapters.

pub const MAX_ROUNDS: u32 = 30;
pub const MIN_PLAYERS_REQUIRED: usize = 2;

// Inclusive range players pick their two numbers from.
pub const MIN_NUM: i32 = 1;
pub const MAX_NUM: i32 = 10;

// Reaching exactly this score ends the game on the spot.
pub const INSTANT_WIN_SCORE: i32 = 21;

pub const EXACT_MATCH_SCORE: i32 = 5;
pub const INSIDE_BOUNDS_SCORE: i32 = 5;
pub const OUT_OF_BOUNDS_SCORE: i32 = -1;

// Top score before any round has been played.
pub const INITIAL_TOP_SCORE: i32 = i8::MIN as i32;
