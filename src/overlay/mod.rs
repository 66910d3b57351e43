pub mod controller;
pub mod surface;
