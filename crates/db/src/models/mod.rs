pub mod approval;
pub mod audit;
pub mod form;
pub mod user;
