//! Inputs consumed from the host: module descriptors, resources and language files.

pub mod fetch;
pub mod language_file;
pub mod module;
