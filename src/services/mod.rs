pub mod allocator;
pub mod link_service;
pub mod redirect;

pub use allocator::CodeAllocator;
pub use link_service::{CreateLinkRequest, LinkService};
pub use redirect::RedirectResolver;
