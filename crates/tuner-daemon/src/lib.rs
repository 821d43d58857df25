pub mod effector;
pub mod http;
pub mod mime;
pub mod static_files;
pub mod tuner;
