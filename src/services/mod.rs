//! Business logic services

pub mod catalog;
pub mod subscriptions;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub catalog: catalog::CatalogService,
    pub subscriptions: subscriptions::SubscriptionRecordResolver<Repository>,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            subscriptions: subscriptions::SubscriptionRecordResolver::new(repository.clone()),
            repository,
        }
    }
}
