//! Plain data types shared by hosts and live views

pub mod marker;
pub mod span;
pub mod style;
