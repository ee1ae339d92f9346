pub mod app;
pub mod cli;
pub mod config;
pub mod feed;
pub mod fetch;
pub mod output;
pub mod runner;
pub mod tui;

#[cfg(test)]
mod tests;
