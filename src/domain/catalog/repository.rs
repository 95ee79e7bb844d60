//! Catalog repository interface

use async_trait::async_trait;

use super::model::{Plan, Plugin};
use crate::shared::errors::DomainResult;

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn find_plan(&self, id: &str) -> DomainResult<Option<Plan>>;
    async fn list_plans(&self) -> DomainResult<Vec<Plan>>;
    async fn find_plugin(&self, id: &str) -> DomainResult<Option<Plugin>>;
    async fn list_plugins(&self) -> DomainResult<Vec<Plugin>>;
    /// ISO 4217 code every price in the catalog is expressed in.
    fn currency(&self) -> &str;
}
