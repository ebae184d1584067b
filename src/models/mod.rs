// src/models/mod.rs
pub mod bus;
pub mod bus_stop;
pub mod faculty;
pub mod pagination;
pub mod student_trip;
pub mod trip;
pub mod trip_bus_stop;
pub mod user;
