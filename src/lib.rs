//! 旅行小站后端库
//! 认证网关（注册、登录、令牌校验）与拼车、旅伴、历史遗迹接口

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod telemetry;
