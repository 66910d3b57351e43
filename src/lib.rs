pub mod bridge;
pub mod cli;
pub mod dom;
pub mod engine;
pub mod observe;
pub mod overlay;
pub mod report;
pub mod scenario;
pub mod trace;
pub mod ui;
