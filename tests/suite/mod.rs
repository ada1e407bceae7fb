mod boundary;
mod config;
mod reporting;
