//! Flat-file JSON persistence for authenticated users.

pub mod users;

pub use users::UserStore;
