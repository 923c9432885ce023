pub mod cli;
pub mod domain;
pub mod error;
pub mod fetcher;
pub mod host;
pub mod logging;
pub mod notify;
pub mod playlist;
pub mod preload;
pub mod settings;
pub mod store;
