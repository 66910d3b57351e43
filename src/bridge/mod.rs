pub mod dispatch;
pub mod protocol;
