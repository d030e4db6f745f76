mod fixture_admin;

pub use fixture_admin::*;
