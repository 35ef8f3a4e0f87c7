#![deny(warnings)]

pub mod config;
pub mod lang;
pub mod render;
pub mod translate;
