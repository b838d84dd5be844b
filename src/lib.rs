// Library for tests to access modules

pub mod api;
pub mod collector;
pub mod config;
pub mod models;
pub mod spaces;
pub mod version;
pub mod worker;
pub mod zone;
