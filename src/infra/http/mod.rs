mod cookies;
mod middleware;
mod public;

pub use cookies::CookieStateStore;
pub use middleware::REQUEST_ID_HEADER;
pub use public::{HttpState, build_router};
