pub mod channel;
pub mod client;
pub mod links;
pub mod probe;
