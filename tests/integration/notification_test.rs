//! Pushed notifications and the unread counter.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use backoffice_entity::notification::{CreateNotification, NotificationKind};
use backoffice_service::Destination;

use crate::helpers::{TestApp, eventually};

#[tokio::test]
async fn test_pushed_notification_raises_unread_count() {
    let app = TestApp::new().await;
    let center = &app.services.notifications;
    center.fetch().await.unwrap();
    assert_eq!(center.unread_count(), 0);

    let seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&seen);
    let subscription = center
        .subscribe_with(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .await
        .unwrap();

    center
        .publish(CreateNotification::new(
            "Nuevo pedido",
            "Juan Perez pidió Amnesia",
            NotificationKind::Info,
        ))
        .await
        .unwrap();

    assert!(eventually(|| center.unread_count() == 1).await);
    assert_eq!(seen.load(Ordering::SeqCst), 1);
    assert_eq!(center.notifications().await[0].title, "Nuevo pedido");

    subscription.unsubscribe();
}

#[tokio::test]
async fn test_opening_order_notification_routes_and_marks_read() {
    let app = TestApp::new().await;
    let juan = app.create_member("Juan Perez", None).await;
    let order = app
        .services
        .orders
        .create(TestApp::order_draft(&juan, "Amnesia", 5, 25000))
        .await
        .unwrap();
    let center = &app.services.notifications;
    let published = center
        .publish(
            CreateNotification::new("Pedido listo", "Sale hoy", NotificationKind::Success)
                .for_order(order.id),
        )
        .await
        .unwrap();
    center.fetch().await.unwrap();
    assert_eq!(center.unread_count(), 1);

    let destination = center.open(published.id).await.unwrap();
    assert_eq!(destination, Destination::OrderDetail(order.id));
    assert_eq!(center.unread_count(), 0);

    center.fetch().await.unwrap();
    assert!(center.notifications().await.iter().all(|n| n.read));
}
