pub mod daemon;
pub mod plan;
pub mod prefs;
pub mod send;
