//! 服务层
//!
//! # 服务列表
//!
//! - [`CatalogLookup`] - 菜单目录查询接口 (外部系统)
//! - [`InMemoryCatalog`] - 内存缓存目录实现

pub mod catalog_service;

pub use catalog_service::{CatalogEntry, CatalogError, CatalogLookup, InMemoryCatalog};
