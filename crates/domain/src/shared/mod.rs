pub mod email;
pub mod entity;
