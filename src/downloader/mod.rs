// file: src/downloader/mod.rs
// description: avatar download module exports
// reference: internal module structure

pub mod avatar;

pub use avatar::AvatarDownloader;
