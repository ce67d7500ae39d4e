pub mod auth;
pub mod document;
pub mod invite;
pub mod tenancy;
pub mod unit;
