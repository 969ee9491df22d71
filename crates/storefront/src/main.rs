//! `MyShop` storefront demo.
//!
//! Walks one shopper through the storefront against the configured store:
//! sign up (or log in on a rerun), fill the cart, check out with `PayPal`,
//! and wait for the deferred cart clear. Set `MYSHOP_DATA_DIR` to keep
//! state between runs.

#![cfg_attr(not(test), forbid(unsafe_code))]

use myshop_core::{Membership, PaymentMethod};
use myshop_storefront::{
    AppState, AuthService, CartService, CatalogService, CheckoutService, ErrorKind,
    StorefrontConfig, open_store,
};

const DEMO_NAME: &str = "Demo Shopper";
const DEMO_EMAIL: &str = "demo@myshop.test";
const DEMO_PASSWORD: &str = "demo-password";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "myshop_storefront=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = StorefrontConfig::from_env()?;
    let store = open_store(&config)?;
    let state = AppState::open(config, store)?;

    let auth = AuthService::new(&state);
    let user = match auth.signup(DEMO_NAME, DEMO_EMAIL, DEMO_PASSWORD, Membership::Basic) {
        Ok(user) => user,
        Err(e) if e.kind() == ErrorKind::Conflict => auth.login(DEMO_EMAIL, DEMO_PASSWORD)?,
        Err(e) => return Err(e.into()),
    };
    tracing::info!(user_id = %user.id, name = %user.name, "Signed in");

    let catalog = CatalogService::new(&state);
    for product in &catalog.list_all()? {
        tracing::info!(
            product_id = %product.id,
            name = %product.name,
            price = %product.price,
            "Catalog"
        );
    }

    let cart = CartService::new(&state);
    for product in &catalog.search("phone")? {
        cart.add(product.id, 1)?;
    }
    let summary = cart.summary()?;
    tracing::info!(
        items = summary.item_count,
        subtotal = %summary.subtotal,
        shipping = %summary.shipping,
        total = %summary.total,
        "Cart ready"
    );

    let outcome = CheckoutService::new(&state).pay(PaymentMethod::Paypal, None)?;
    tracing::info!(order_id = %outcome.receipt.order_id, "Order placed, clearing cart shortly");

    outcome.pending_clear.wait().await;
    tracing::info!(items = cart.item_count()?, "Cart after checkout");

    auth.logout()?;
    Ok(())
}
