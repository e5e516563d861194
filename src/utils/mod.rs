mod string;

pub use string::{canonical_identifier, extract_last_segment, unquote_string};
