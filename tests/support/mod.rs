#![allow(dead_code)]

pub mod cropmate_env;
pub mod soil;
