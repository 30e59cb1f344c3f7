mod reschedule_properties;
mod slot_properties;
