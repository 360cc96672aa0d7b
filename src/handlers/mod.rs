//! Request handlers module

pub mod bind;
pub mod department;
pub mod employee;
pub mod student;
pub mod user;
