// file: src/parser/mod.rs
// description: html parsing module exports
// reference: internal module structure

pub mod following;

pub use following::FollowingParser;
