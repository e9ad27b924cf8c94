mod bookings;
mod config_cmd;

pub use bookings::BookingCommand;
pub use config_cmd::ConfigCommand;
