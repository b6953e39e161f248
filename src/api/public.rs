//! Public API types

// Re-export public types from each route

pub mod chat {
    pub use crate::api::routes::chat::public::*;
}

pub mod contact {
    pub use crate::api::routes::contact::public::*;
}
