mod entry_path;
pub use entry_path::{encode_ascii_lossy, normalize_entry_path};

mod format_bytes;
pub use format_bytes::format_bytes;

mod frugal_list;
pub use frugal_list::FrugalList;

mod parse_buffer_size;
pub use parse_buffer_size::parse_buffer_size;

mod verify_file_existence;
pub use verify_file_existence::verify_file_existence;
