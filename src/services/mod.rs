// Service module exports

pub mod event;
pub mod mutation;
pub mod notification;
pub mod occurrence;
pub mod reschedule;
pub mod settings;
