// Utility modules
// Pure date and grid helpers with no service dependencies

pub mod date;
pub mod slot;
