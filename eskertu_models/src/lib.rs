pub mod settings;
pub mod subscriber;
pub mod tenant;

pub use chrono;
pub use chrono_tz;
