pub mod app;
mod capabilities;
mod commands;
mod context;
mod dispatch;
mod env;
mod generate;
mod info;
mod outline;
mod output;
mod run;
mod runtime;
