use shadow_rs::shadow;

shadow!(build);

// Internals
// ---------
pub mod frontier;
pub mod heap;

// Search space and problems
// -------------------------
pub mod cost;
pub mod problem;
pub mod search;
pub mod space;

// Problems
// --------
pub mod problems;

// Algorithms
// ----------
pub mod algorithms;

// Running searches
// ----------------
pub mod config;
pub mod engine;
pub mod render;
pub mod report;
