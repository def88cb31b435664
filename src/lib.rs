pub mod audit;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod entity;
pub mod error;
pub mod graphql;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
