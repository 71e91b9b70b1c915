pub mod config;
pub mod devices;
pub mod model;
pub mod storage;
pub mod store;
pub mod timecalc;
pub mod widgets;
