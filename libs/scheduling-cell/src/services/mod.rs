pub mod booking;
pub mod timeline;
pub mod validator;
