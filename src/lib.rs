pub mod certificate;
pub mod config;
pub mod db;
pub mod error;
pub mod member_id;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
