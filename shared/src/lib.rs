pub mod clan;
pub mod summary;
pub mod time_format;

pub use clan::{ClanRef, normalize_tag, same_tag};
pub use summary::*;
pub use time_format::format_relative;
