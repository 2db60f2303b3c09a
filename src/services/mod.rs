//! Service modules for hosting sessions outside the terminal front end.

pub mod registry;
