pub mod health;
pub mod info;
pub mod routes;
pub mod serve;
