pub mod connect_attrs;
pub mod login;
