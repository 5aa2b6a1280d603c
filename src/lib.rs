pub mod credentials;
pub mod http;
pub mod session;
pub mod ui;
