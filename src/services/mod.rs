// src/services/mod.rs
pub mod auth_service;
pub mod bus_service;
pub mod bus_stop_service;
pub mod faculty_service;
pub mod mail_service;
pub mod notification_service;
pub mod student_trip_service;
pub mod trip_bus_stop_service;
pub mod trip_service;
pub mod user_service;
