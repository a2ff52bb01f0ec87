pub mod link;

pub use link::RadioLink;
