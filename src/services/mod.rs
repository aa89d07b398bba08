pub mod geolocation;
pub mod map;
pub mod store;
