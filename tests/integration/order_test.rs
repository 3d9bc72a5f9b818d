//! Order lifecycle through the shared services.

use rust_decimal::Decimal;

use backoffice_core::error::ErrorKind;
use backoffice_entity::order::{FulfillmentMode, OrderStatus, PaymentStatus};
use backoffice_service::Notice;
use backoffice_service::views::{OrderFilter, StatusFilter};

use crate::helpers::TestApp;

#[tokio::test]
async fn test_member_without_phone_orders_for_pickup() {
    let app = TestApp::new().await;
    let juan = app.create_member("Juan Perez", None).await;
    assert!(juan.phone.is_none());

    let order = app
        .services
        .orders
        .create(TestApp::order_draft(&juan, "Amnesia", 5, 25000))
        .await
        .unwrap();
    assert_eq!(order.mode, FulfillmentMode::Pickup);
    assert!(order.address.is_none());
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.payment_status, PaymentStatus::Pending);

    let history = app.services.members.history(juan.id).await.unwrap();
    assert_eq!(history.orders.len(), 1);
    assert_eq!(history.metrics.total_spent, Decimal::from(25000));
    assert_eq!(history.metrics.frequency_days, None);
}

#[tokio::test]
async fn test_delivery_requires_address() {
    let app = TestApp::new().await;
    let juan = app.create_member("Juan Perez", None).await;

    let result = app
        .services
        .orders
        .create(TestApp::order_draft(&juan, "Amnesia", 1, 5000).mode(FulfillmentMode::Delivery))
        .await;
    let (created, notice) = Notice::settle(result, "Pedido creado", "No se pudo crear el pedido");
    assert!(created.is_none());
    assert!(notice.is_error());
    assert!(notice.message.starts_with("address"));
    assert!(app.services.orders.load().await.unwrap().is_empty());

    let order = app
        .services
        .orders
        .create(
            TestApp::order_draft(&juan, "Amnesia", 1, 5000)
                .mode(FulfillmentMode::Delivery)
                .address("Calle 123"),
        )
        .await
        .unwrap();
    assert_eq!(order.address.as_deref(), Some("Calle 123"));
}

#[tokio::test]
async fn test_status_change_is_visible_before_and_after_reload() {
    let app = TestApp::new().await;
    let juan = app.create_member("Juan Perez", None).await;
    let orders = &app.services.orders;
    let order = orders
        .create(TestApp::order_draft(&juan, "Amnesia", 5, 25000))
        .await
        .unwrap();

    orders
        .set_status(order.id, OrderStatus::OutForDelivery)
        .await
        .unwrap();
    let visible = orders
        .filtered(&OrderFilter::default().status(StatusFilter::Only(OrderStatus::OutForDelivery)))
        .await;
    assert_eq!(visible.len(), 1);

    orders.load().await.unwrap();
    assert_eq!(
        orders.get(order.id).await.unwrap().status,
        OrderStatus::OutForDelivery
    );

    assert_eq!(
        orders.toggle_payment(order.id).await.unwrap(),
        PaymentStatus::Confirmed
    );
}

#[tokio::test]
async fn test_deleting_member_keeps_error_kinds_apart() {
    let app = TestApp::new().await;
    let ana = app.create_member("Ana", Some("555-0101")).await;
    app.services.members.delete(ana.id).await.unwrap();

    let err = app.services.members.get(ana.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert!(app.services.members.search("ana").await.unwrap().is_empty());
}
