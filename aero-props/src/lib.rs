// utils
pub mod config;
pub mod error;
pub mod xml;

// element tree & codec traits
pub mod element;
pub mod status;

// webdav
pub mod decoder;
pub mod encoder;
pub mod types;

// partial failures
pub mod multistatus;
pub mod propfind;
