pub mod middleware;

pub use middleware::RequireUser;
