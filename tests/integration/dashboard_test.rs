//! Dashboard over freshly created orders.

use rust_decimal::Decimal;

use backoffice_entity::order::OrderStatus;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_dashboard_counts_todays_orders() {
    let app = TestApp::new().await;
    let juan = app.create_member("Juan Perez", None).await;
    let ana = app.create_member("Ana", None).await;
    let orders = &app.services.orders;

    orders
        .create(TestApp::order_draft(&juan, "Amnesia", 5, 25000))
        .await
        .unwrap();
    orders
        .create(TestApp::order_draft(&ana, "Critical", 8, 15000))
        .await
        .unwrap();
    let third = orders
        .create(TestApp::order_draft(&ana, "Amnesia", 2, 20000))
        .await
        .unwrap();
    orders
        .set_status(third.id, OrderStatus::OutForDelivery)
        .await
        .unwrap();

    let summary = app.services.dashboard.load().await.unwrap();
    assert_eq!(summary.totals.revenue, Decimal::from(60000));
    assert_eq!(summary.totals.order_count, 3);
    assert_eq!(summary.totals.distinct_members, 2);
    assert_eq!(summary.quick.pending_today, 2);
    assert_eq!(summary.quick.out_for_delivery, 1);
    assert_eq!(summary.quick.payment_pending, 3);

    assert_eq!(summary.daily.len(), app.config.dashboard.trailing_days as usize);
    let last = summary.daily.last().unwrap();
    assert_eq!(last.date, summary.today);
    assert_eq!(last.count, 3);

    assert_eq!(summary.top_varieties[0].variety, "Critical");
    assert_eq!(summary.top_varieties[1].variety, "Amnesia");
    assert_eq!(summary.top_varieties[1].quantity, Decimal::from(7));
}
