//! Terminal output of roundtable events

pub mod console;
