pub mod colors;
pub mod formatting;
pub mod path;
pub mod table;
pub mod time;

pub use formatting::{bold, swatch};
pub use time::{format_hms, format_short};
