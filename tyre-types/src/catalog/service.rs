use crate::catalog::{Catalog, CatalogState};
use crate::product::Product;
use actix::prelude::*;
use async_trait::async_trait;
use std::sync::Arc;

/// Where the product list comes from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn load(&self) -> Result<Vec<Product>, anyhow::Error>;

    fn describe(&self) -> String;
}

/// Owns the session catalog. Loading starts once, when the actor starts; it
/// is never retried. A failed load is logged and leaves an empty catalog.
pub struct CatalogService {
    source: Option<Arc<dyn CatalogSource>>,
    state: CatalogState,
}

impl CatalogService {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self {
            source: Some(source),
            state: CatalogState::Loading,
        }
    }

    /// Service over an already loaded catalog.
    pub fn ready(catalog: Catalog) -> Self {
        Self {
            source: None,
            state: CatalogState::Ready(Arc::new(catalog)),
        }
    }
}

impl Actor for CatalogService {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        let Some(source) = self.source.clone() else {
            return;
        };
        let name = source.describe();
        log::info!("Loading catalog from {name}");
        ctx.spawn(async move { source.load().await }.into_actor(self).map(
            move |res, act, _| {
                let products = match res {
                    Ok(products) => {
                        log::info!("Loaded {} products from {name}", products.len());
                        products
                    }
                    Err(err) => {
                        log::error!("Failed to load products from {name}: {err:?}");
                        vec![]
                    }
                };
                act.state = CatalogState::Ready(Arc::new(Catalog::new(products)));
            },
        ));
    }
}

#[derive(Message)]
#[rtype(result = "CatalogState")]
pub struct Get;

impl Handler<Get> for CatalogService {
    type Result = MessageResult<Get>;

    fn handle(&mut self, _: Get, _: &mut Self::Context) -> Self::Result {
        MessageResult(self.state.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use serde_json::json;
    use std::time::Duration;

    struct Fixed(Vec<Product>);

    #[async_trait]
    impl CatalogSource for Fixed {
        async fn load(&self) -> Result<Vec<Product>, anyhow::Error> {
            Ok(self.0.clone())
        }
        fn describe(&self) -> String {
            "fixture".to_string()
        }
    }

    struct Broken;

    #[async_trait]
    impl CatalogSource for Broken {
        async fn load(&self) -> Result<Vec<Product>, anyhow::Error> {
            Err(anyhow!("connection refused"))
        }
        fn describe(&self) -> String {
            "broken".to_string()
        }
    }

    struct Pending;

    #[async_trait]
    impl CatalogSource for Pending {
        async fn load(&self) -> Result<Vec<Product>, anyhow::Error> {
            std::future::pending::<()>().await;
            Ok(vec![])
        }
        fn describe(&self) -> String {
            "pending".to_string()
        }
    }

    async fn wait_ready(addr: &Addr<CatalogService>) -> Arc<Catalog> {
        for _ in 0..100 {
            if let CatalogState::Ready(catalog) = addr.send(Get).await.unwrap() {
                return catalog;
            }
            actix_rt::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("catalog never finished loading");
    }

    #[actix_rt::test]
    async fn serves_loaded_catalog() {
        let product = Product::try_from(json!({ "product_name": "Alnac 4G" })).unwrap();
        let addr = CatalogService::new(Arc::new(Fixed(vec![product]))).start();
        let catalog = wait_ready(&addr).await;
        assert_eq!(catalog.len(), 1);
    }

    #[actix_rt::test]
    async fn failed_load_becomes_empty_catalog() {
        let addr = CatalogService::new(Arc::new(Broken)).start();
        let catalog = wait_ready(&addr).await;
        assert!(catalog.is_empty());
    }

    #[actix_rt::test]
    async fn ready_service_skips_loading() {
        let product = Product::try_from(json!({ "product_name": "Aspire 4G" })).unwrap();
        let addr = CatalogService::ready(Catalog::new(vec![product])).start();
        match addr.send(Get).await.unwrap() {
            CatalogState::Ready(catalog) => assert_eq!(catalog.len(), 1),
            CatalogState::Loading => panic!("expected a ready catalog"),
        }
    }

    #[actix_rt::test]
    async fn reports_loading_while_pending() {
        let addr = CatalogService::new(Arc::new(Pending)).start();
        assert!(addr.send(Get).await.unwrap().is_loading());
    }
}
