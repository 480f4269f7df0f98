//! Core CRM rules.
//!
//! This crate contains pure logic with ZERO web or database dependencies.
//!
//! # Modules
//!
//! - `guard` - Record-existence assertions
//! - `patch` - Update payload coercion (blank string clears a column)
//! - `entity` - Individual / non-individual payload resolution
//! - `pricing` - Line-item price truncation
//! - `contact` - E-mail, phone, and address field checks
//! - `auth` - Password policy and hashing

pub mod auth;
pub mod contact;
pub mod entity;
pub mod guard;
pub mod patch;
pub mod pricing;
