pub mod store;

pub use store::{PreloadSettings, default_data_dir, load_settings, save_settings};
