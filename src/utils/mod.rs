pub mod export;
pub mod formatting;
pub mod helpers;
pub mod time_parser;
pub mod validation;

pub use formatting::{format_file_size, format_short_code, short_url};
pub use helpers::{FilterType, filter_items, parse_short_codes};
pub use time_parser::{TimeParser, format_date_for_input, is_expired};
