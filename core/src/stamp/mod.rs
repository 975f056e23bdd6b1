mod formatter;
mod layout;
mod writer;

pub use formatter::{StampFormatter, WriterConfig};
pub use layout::{TimeFormat, TimeLayout};
pub use writer::LineStampWriter;
