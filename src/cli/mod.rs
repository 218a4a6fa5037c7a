mod inspect;
mod request;
mod root;
mod simulate;

pub use root::Cli;
