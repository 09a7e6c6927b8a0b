//! HTML route handlers

pub mod print;
