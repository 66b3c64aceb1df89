// Material
pub const WEIGHT_CHECKERS_COUNT: i32 = 120;
pub const WEIGHT_DOUBLES: i32 = 1;

// Mobility: shortest routes to bearing off (Doubles) and crowning (Singles)
pub const WEIGHT_DOUBLES_PATHS: i32 = 8;
pub const WEIGHT_SINGLES_PATHS: i32 = 2;

// A route worth `MAX - steps`; beyond MAX steps it is worth nothing.
pub const DOUBLES_PATHS_MAX: i32 = 10;
pub const SINGLES_PATHS_MAX: i32 = 10;

pub const SCORE_WIN: i32 = 1000;
