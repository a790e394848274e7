pub mod admin;
pub mod meme;
pub mod notify;
pub mod upload;
