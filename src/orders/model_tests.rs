//! Tests for order records, filters and cancellation requests.

use chrono::{TimeZone, Utc};
use serde_json::json;

use super::*;
use crate::session::{Role, User};
use crate::test_support::{order_json, product_json};

fn order(id: &str, status: &str) -> Order {
    serde_json::from_value(order_json(id, status)).unwrap()
}

fn product(status: &str, can_cancel: bool) -> Product {
    serde_json::from_value(product_json("p1", status, can_cancel)).unwrap()
}

mod status {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Cancelled".parse::<OrderStatus>().unwrap(), OrderStatus::Cancelled);
        assert_eq!(" pending ".parse::<OrderStatus>().unwrap(), OrderStatus::Pending);
    }

    #[test]
    fn rejects_unknown_status() {
        let err = "shipped".parse::<OrderStatus>().unwrap_err();
        assert!(err.to_string().contains("shipped"));
    }

    #[test]
    fn wire_names_match_display() {
        for status in OrderStatus::ALL {
            assert_eq!(serde_json::to_value(status).unwrap(), json!(status.to_string()));
        }
    }
}

mod order_record {
    use super::*;

    #[test]
    fn decodes_wire_form() {
        let order = order("o-1", "confirmed");

        assert_eq!(order.pnr, "PNRo-1");
        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(order.customer.full_name(), "Jane Doe");
        assert_eq!(order.segments[0].flight_number, "EK202");
        assert_eq!(order.total(), Some(Money::new(120.5, "USD")));
    }

    #[test]
    fn total_requires_amount_and_currency() {
        let mut order = order("o-1", "confirmed");
        order.total_currency = None;
        assert!(order.total().is_none());
    }

    #[test]
    fn search_matches_pnr_name_and_email() {
        let order = order("o-1", "pending");

        assert!(order.matches_search(""));
        assert!(order.matches_search("pnro-1"));
        assert!(order.matches_search("JANE"));
        assert!(order.matches_search("doe"));
        assert!(order.matches_search("example.com"));
        assert!(!order.matches_search("smith"));
    }

    #[test]
    fn status_counts_tally_by_status() {
        let orders = [
            order("o-1", "cancelled"),
            order("o-2", "cancelled"),
            order("o-3", "confirmed"),
        ];

        let counts = StatusCounts::tally(&orders);

        assert_eq!(counts.get(OrderStatus::Cancelled), 2);
        assert_eq!(counts.get(OrderStatus::Confirmed), 1);
        assert_eq!(counts.get(OrderStatus::Refunded), 0);
        assert_eq!(counts.total(), 3);
    }
}

mod product_record {
    use super::*;

    #[test]
    fn cancellable_only_when_allowed_and_not_cancelled() {
        assert!(product("active", true).is_cancellable());
        assert!(product("pending", true).is_cancellable());
        assert!(!product("cancelled", true).is_cancellable());
        assert!(!product("active", false).is_cancellable());
    }

    #[test]
    fn refund_percentage_uses_largest_threshold_met() {
        let policy = product("active", true).cancellation_policy;

        assert!((policy.refund_percentage(100.0) - 100.0).abs() < f64::EPSILON);
        assert!((policy.refund_percentage(72.0) - 100.0).abs() < f64::EPSILON);
        assert!((policy.refund_percentage(48.0) - 50.0).abs() < f64::EPSILON);
        assert!(policy.refund_percentage(10.0).abs() < f64::EPSILON);
        assert!(policy.refund_percentage(-1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn refund_estimate_applies_window_to_price() {
        let product = product("active", true);
        let now = Utc.with_ymd_and_hms(2026, 10, 30, 6, 0, 0).unwrap();

        let estimate = product.refund_estimate(now).unwrap();

        assert!((estimate.hours_before_service - 48.0).abs() < f64::EPSILON);
        assert!((estimate.percentage - 50.0).abs() < f64::EPSILON);
        assert_eq!(estimate.amount, Money::new(40.0, "USD"));
    }

    #[test]
    fn no_estimate_for_cancelled_product() {
        let now = Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap();
        assert!(product("cancelled", true).refund_estimate(now).is_none());
    }

    #[test]
    fn joined_order_lists_cancellable_products() {
        let joined: OrderWithProducts = serde_json::from_value(json!({
            "order": order_json("o-1", "confirmed"),
            "products": [
                product_json("p1", "active", true),
                product_json("p2", "cancelled", true),
            ]
        }))
        .unwrap();

        let ids: Vec<_> = joined.cancellable_products().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["p1"]);
        assert_eq!(joined.product("p2").unwrap().status, ProductStatus::Cancelled);
        assert_eq!(joined.product("p1").unwrap().metadata["terminal"], json!("3"));
    }
}

mod filter {
    use super::*;

    #[test]
    fn empty_filter_sends_nothing() {
        assert!(OrderFilter::new().to_query().is_empty());
    }

    #[test]
    fn sends_every_set_option() {
        let query = OrderFilter::new()
            .page(2)
            .limit(25)
            .status(OrderStatus::Cancelled)
            .provider("LoungeCo")
            .product_type("lounge")
            .to_query();

        assert_eq!(
            query,
            vec![
                ("page", "2".to_string()),
                ("limit", "25".to_string()),
                ("status", "cancelled".to_string()),
                ("provider", "LoungeCo".to_string()),
                ("type", "lounge".to_string()),
            ]
        );
    }

    #[test]
    fn zero_and_blank_values_are_unset() {
        let query = OrderFilter::new().page(0).limit(0).provider("  ").to_query();
        assert!(query.is_empty());
    }
}

mod cancellation {
    use super::*;

    #[test]
    fn role_mapping_is_total() {
        let cases = [
            (Role::Admin, RequestSource::AdminPanel, RequesterRole::Admin),
            (
                Role::CustomerService,
                RequestSource::AdminPanel,
                RequesterRole::CustomerService,
            ),
            (Role::Partner, RequestSource::PartnerApi, RequesterRole::Partner),
            (Role::System, RequestSource::System, RequesterRole::System),
            (Role::Customer, RequestSource::CustomerApp, RequesterRole::Customer),
            (Role::from("guest"), RequestSource::CustomerApp, RequesterRole::Customer),
            (Role::from(""), RequestSource::CustomerApp, RequesterRole::Customer),
        ];

        for (role, source, normalized) in cases {
            assert_eq!(request_origin(&role), (source, normalized), "role {role}");
        }
    }

    #[test]
    fn target_from_product_ids() {
        assert_eq!(CancelTarget::from_product_ids(&[]), CancelTarget::WholeOrder);
        assert_eq!(
            CancelTarget::from_product_ids(&["p1".to_string()]),
            CancelTarget::Product("p1".to_string())
        );
        assert_eq!(
            CancelTarget::from_product_ids(&["p1".to_string(), "p2".to_string()]),
            CancelTarget::WholeOrder
        );
    }

    #[test]
    fn request_serializes_in_wire_form() {
        let partner = User::new("u-7", "partner@lounge.co", Role::Partner);
        let request = CancelRequest::new(
            "o-1",
            "ABC123",
            &CancelTarget::Product("p1".to_string()),
            Some("jane.doe@example.com"),
            Some(&partner),
        );

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "orderIdentifier": {
                    "orderId": "o-1",
                    "pnr": "ABC123",
                    "email": "jane.doe@example.com"
                },
                "productId": "p1",
                "requestSource": "partner_api",
                "reason": "Customer request",
                "requestedBy": {
                    "userId": "u-7",
                    "userRole": "partner",
                    "metadata": { "email": "partner@lounge.co", "source": "partner_api" }
                }
            })
        );
    }

    #[test]
    fn whole_order_omits_product_id() {
        let request =
            CancelRequest::new("o-1", "ABC123", &CancelTarget::WholeOrder, None, None);
        let value = serde_json::to_value(&request).unwrap();

        assert!(value.get("productId").is_none());
    }

    #[test]
    fn email_falls_back_to_acting_user() {
        let agent = User::new("u-1", "agent@arcube.com", Role::CustomerService);
        let request =
            CancelRequest::new("o-1", "ABC123", &CancelTarget::WholeOrder, None, Some(&agent));

        assert_eq!(request.order_identifier.email.as_deref(), Some("agent@arcube.com"));
        assert_eq!(request.request_source, RequestSource::AdminPanel);
    }

    #[test]
    fn blank_customer_email_is_ignored() {
        let agent = User::new("u-1", "agent@arcube.com", Role::CustomerService);
        for blank in ["", "   "] {
            let request = CancelRequest::new(
                "o-1",
                "ABC123",
                &CancelTarget::WholeOrder,
                Some(blank),
                Some(&agent),
            );
            assert_eq!(request.order_identifier.email.as_deref(), Some("agent@arcube.com"));
        }

        let anonymous =
            CancelRequest::new("o-1", "ABC123", &CancelTarget::WholeOrder, Some(""), None);
        let value = serde_json::to_value(&anonymous).unwrap();
        assert!(value["orderIdentifier"].get("email").is_none());
    }

    #[test]
    fn without_acting_user_attributes_to_unknown_customer() {
        let request =
            CancelRequest::new("o-1", "ABC123", &CancelTarget::WholeOrder, None, None);

        assert_eq!(request.requested_by.user_id, UNKNOWN_USER_ID);
        assert_eq!(request.requested_by.user_role, RequesterRole::Customer);
        assert_eq!(request.request_source, RequestSource::CustomerApp);
        assert!(request.order_identifier.email.is_none());
        assert_eq!(request.reason, CANCEL_REASON);
    }
}
