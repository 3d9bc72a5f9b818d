//! End-to-end flows over the in-process backend.

mod helpers;

mod dashboard_test;
mod file_test;
mod notification_test;
mod order_test;
