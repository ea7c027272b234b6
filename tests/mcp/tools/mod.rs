mod config;
mod resolve;
