//! Application layer: authentication, the session context, and the
//! service operations a front end calls. Composes the workflow engine
//! (`formline-core`) with the persistence gateway (`formline-db`).

pub mod bootstrap;
pub mod error;
pub mod password;
pub mod service;
pub mod session;
