mod handlers;
mod routes;
mod vcard;

pub use routes::create_public_router;
pub use vcard::render_vcard;
