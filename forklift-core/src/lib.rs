//! Forklift Core
//!
//! Core types and rules for the Forklift Repair Logging System.
//!
//! This crate contains:
//! - Domain types: fleet, users and maintenance jobs
//! - DTOs: form payloads posted by the HTML pages
//! - Authorization, pagination, PM scheduling and password rules shared
//!   by the server and the admin CLI

pub mod authz;
pub mod domain;
pub mod dto;
pub mod pagination;
pub mod password;
pub mod schedule;
