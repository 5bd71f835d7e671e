// MIT License
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
pub mod start_system;
pub mod symbolic;
pub mod tracking;
pub mod utils;
