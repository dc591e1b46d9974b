//! Download pipeline: streaming file fetch and archive unpacking.

pub mod file;
pub mod unpack;

pub use file::fetch_item_file;
pub use unpack::maybe_extract;
