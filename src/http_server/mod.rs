pub mod app;
pub mod error;
pub mod forms;
pub mod pages;
pub mod routes;
pub mod state;
