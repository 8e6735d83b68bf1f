pub mod auth;
pub mod cors;
pub mod region;

pub use auth::AuthenticatedUser;
pub use cors::apply_cors_headers;
pub use region::AllowedRegion;
