//! HTTP 处理器模块

pub mod auth;
pub mod buddy;
pub mod health;
pub mod ride;
pub mod site;
