//! Authentication primitives.
//!
//! - [`jwt`] -- validation of bearer access tokens issued by the auth provider.

pub mod jwt;
