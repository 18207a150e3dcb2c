pub mod analyze;
pub mod ask;
pub mod chat;
pub mod config;
pub mod doctor;
pub mod improve;
pub mod info;
