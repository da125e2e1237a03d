use std::net::SocketAddr;

use async_trait::async_trait;
use storefront_core::{
    ColorOption, Decision, HttpResourceClient, PaymentOptions, Product, Prompt, Resource,
    UpiConfig,
};
use storefront_server::{create_router, AppState};

/// Gives the same answer to every confirmation.
pub struct FixedAnswer(pub Option<Decision>);

#[async_trait]
impl Prompt for FixedAnswer {
    async fn ask(&mut self, _message: &str) -> Option<Decision> {
        self.0
    }
}

pub fn shirt() -> Product {
    Product {
        id: "p1".into(),
        image: "shirt.png".into(),
        name: "Shirt".into(),
        mrp: 999.0,
        selling_price: 499.0,
        description: String::new(),
        sizes: vec!["S".into(), "M".into()],
        colors: vec![ColorOption { name: "Red".into(), image: "r.png".into() }],
        variant: "Cotton".into(),
        carousel_images: Vec::new(),
        assured_image: None,
    }
}

pub fn shop_upi() -> UpiConfig {
    UpiConfig {
        id: "u1".into(),
        upi_id: "shop@upi".into(),
        upi_name: "Shop".into(),
        payment_options: PaymentOptions::default(),
    }
}

/// Serves the real router on an ephemeral port and returns its base URL.
pub async fn serve(state: AppState) -> String {
    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, create_router(state)).await.expect("serve");
    });
    format!("http://{addr}")
}

pub fn client<R: Resource>(base: &str) -> HttpResourceClient<R> {
    HttpResourceClient::with_client(reqwest::Client::new(), base)
}
