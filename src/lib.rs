pub mod cli;
pub mod commands;
pub mod prim;
pub mod tools;
pub mod utils;
