// Middleware modules for the toolbox backend

pub mod client_ip;
pub mod cors;

pub use client_ip::ClientIp;
pub use cors::cors_middleware;
