pub mod key;
pub mod reference;
pub mod trust;

pub use key::{CACHE_FILE_PATTERN, derive_file_name};
pub use reference::{host_of, is_remote};
pub use trust::TrustPolicy;
