pub mod catalog;
pub mod reviews;

use std::sync::Arc;

use booklist_db::BookStore;
use booklist_kernel::ModuleRegistry;
use booklist_reviews::ReviewGateway;

/// Register the catalog and reviews modules with the registry
pub fn register_all(
    registry: &mut ModuleRegistry,
    store: Arc<dyn BookStore>,
    gateway: Arc<dyn ReviewGateway>,
) {
    registry.register_custom(Arc::new(catalog::CatalogModule::new(store)));
    registry.register_custom(Arc::new(reviews::ReviewsModule::new(gateway)));
}
