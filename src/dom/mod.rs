pub mod element;
pub mod fill;
pub mod page;
pub mod scanner;
