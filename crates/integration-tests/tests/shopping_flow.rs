//! End-to-end shopping flow: browse, fill the cart, pay, and watch the
//! deferred clear land in storage.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use myshop_core::{Membership, PaymentMethod, Price, ProductId};
use myshop_integration_tests::TestContext;
use myshop_storefront::{
    AuthService, CardDetails, CartService, CatalogService, CheckoutService, ErrorKind,
};

#[tokio::test(start_paused = true)]
async fn test_browse_add_and_pay_by_card() {
    let ctx = TestContext::new();
    let state = ctx.open().unwrap();

    let auth = AuthService::new(&state);
    auth.signup("Shopper", "shopper@example.com", "pw", Membership::Basic)
        .unwrap();

    let catalog = CatalogService::new(&state);
    let laptop = catalog.search("laptop").unwrap().iter().next().cloned().unwrap();

    let cart = CartService::new(&state);
    cart.add(laptop.id, 1).unwrap();

    let summary = cart.summary().unwrap();
    assert_eq!(summary.subtotal, Price::from_dollars(999));
    assert_eq!(summary.shipping, Price::ZERO);
    assert_eq!(summary.total, Price::from_dollars(999));

    let card = CardDetails {
        holder: "Shopper".to_owned(),
        number: "1234 5678 9012 3456".to_owned(),
        expiry: "12/25".to_owned(),
        cvv: "123".to_owned(),
    };
    let outcome = CheckoutService::new(&state)
        .pay(PaymentMethod::Credit, Some(&card))
        .unwrap();
    assert_eq!(outcome.receipt.summary, summary);

    // The cart is still there until the delay elapses.
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(ctx.stored("cart").unwrap().unwrap()[0]["quantity"], 1);

    outcome.pending_clear.wait().await;
    assert_eq!(ctx.stored("cart").unwrap(), Some(serde_json::json!([])));
    assert_eq!(cart.item_count().unwrap(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_small_order_pays_flat_shipping() {
    let ctx = TestContext::new();
    let state = ctx.open().unwrap();

    let seller = AuthService::new(&state)
        .signup("Seller", "seller@example.com", "pw", Membership::Premium)
        .unwrap();
    let mug = CatalogService::new(&state)
        .add_product(
            myshop_storefront::models::NewProduct {
                name: "Mug".to_owned(),
                price: 50.0,
                images: "mug.jpg".to_owned(),
                description: "Ceramic".to_owned(),
            },
            seller.id,
        )
        .unwrap();

    let cart = CartService::new(&state);
    cart.add(mug.id, 1).unwrap();
    assert_eq!(cart.total().unwrap(), Price::from_dollars(65));

    cart.update_quantity(mug.id, 2).unwrap();
    let summary = cart.summary().unwrap();
    assert_eq!(summary.subtotal, Price::from_dollars(100));
    assert_eq!(summary.total, Price::from_dollars(115));

    let outcome = CheckoutService::new(&state)
        .pay(PaymentMethod::Bank, None)
        .unwrap();
    assert_eq!(outcome.receipt.summary.total, Price::from_dollars(115));
    outcome.pending_clear.wait().await;
}

#[tokio::test]
async fn test_rejected_payment_keeps_cart() {
    let ctx = TestContext::new();
    let state = ctx.open().unwrap();
    CartService::new(&state).add(ProductId::new(2), 1).unwrap();

    let card = CardDetails {
        number: "123".to_owned(),
        expiry: "12/25".to_owned(),
        cvv: "123".to_owned(),
        ..CardDetails::default()
    };
    let err = CheckoutService::new(&state)
        .pay(PaymentMethod::Credit, Some(&card))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.user_message(), "Invalid card number");
    assert_eq!(ctx.stored("cart").unwrap().unwrap()[0]["id"], 2);
}

#[tokio::test]
async fn test_unknown_product_is_not_added() {
    let ctx = TestContext::new();
    let state = ctx.open().unwrap();

    let err = CartService::new(&state).add(ProductId::new(12345), 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(ctx.stored("cart").unwrap().is_none());
}
