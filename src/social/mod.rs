// Public API - what other modules can use
pub use graph::{InMemorySocialGraph, PostgresSocialGraph, SocialGraph};
pub use handlers::{
    accept_friend_request, list_friend_requests, list_friends, reject_friend_request,
    send_friend_request,
};

pub mod graph;
pub mod handlers;
pub mod models;
pub mod types;
