use axum::http::Method;
use storefront::{
    access::{Decision, Denial, RequestContext, Requester, has_object_permission, has_permission},
    routes::RouteTable,
};

use crate::helpers::*;

/// Run the gate the way the HTTP layer does: collection check, then the object check
/// for routes that address one object.
fn check(table: &RouteTable, method: Method, path: &str, requester: Requester) -> Decision {
    let matched = table.resolve(path).expect("path should resolve");
    assert!(matched.is_gated(), "{path} should be gated");

    let ctx = RequestContext::from_method(&method, requester);
    let decision = has_permission(&ctx);
    match matched.object_key() {
        Some(key) if decision.is_allowed() => has_object_permission(&ctx, &key),
        _ => decision,
    }
}

#[tokio::test]
async fn test_alice_walkthrough() {
    let table = RouteTable::store_api().unwrap();
    let (storefront, _clock) = test_storefront().await;

    // Creating alice yields exactly one profile
    let mut alice = create_account(&storefront, "alice").await;
    assert_eq!(profiles_for(&storefront, alice.id()).await, 1);

    // Changing her email saves the attached profile without duplicating it
    alice.set_email("alice@shop.example.com");
    alice.profile_mut().unwrap().display_name = Some("Alice".to_string());
    storefront.save_account(&mut alice).await.unwrap();
    assert_eq!(profiles_for(&storefront, alice.id()).await, 1);
    let stored = storefront
        .backend()
        .get_profile(alice.id())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.display_name.as_deref(), Some("Alice"));

    // Anonymous read of a gated endpoint is allowed
    assert_eq!(
        check(&table, Method::GET, "/api/cart/", Requester::Anonymous),
        Decision::Allow
    );

    // Anonymous write is denied as unauthorized
    assert_eq!(
        check(&table, Method::POST, "/api/cart/add/", Requester::Anonymous),
        Decision::Deny(Denial::Unauthorized)
    );

    // The same write by alice is allowed
    let requester = Requester::Authenticated(alice.id().clone());
    assert_eq!(
        check(&table, Method::POST, "/api/cart/add/", requester),
        Decision::Allow
    );
}

#[test]
fn test_every_gated_route_follows_policy() {
    let table = RouteTable::store_api().unwrap();
    let account = Requester::Authenticated(storefront::account::AccountId::generate());

    for route in table.iter().filter(|r| r.is_gated()) {
        let params: Vec<(&str, &str)> = route.params().map(|(name, _)| (name, "1")).collect();
        let path = table.reverse(route.name(), &params).unwrap();

        assert!(check(&table, Method::GET, &path, Requester::Anonymous).is_allowed());
        assert_eq!(
            check(&table, Method::DELETE, &path, Requester::Anonymous),
            Decision::Deny(Denial::Unauthorized),
            "{path}"
        );
        assert!(check(&table, Method::DELETE, &path, account.clone()).is_allowed());
    }
}

#[test]
fn test_object_routes_use_same_decision() {
    let table = RouteTable::store_api().unwrap();

    assert_eq!(
        check(&table, Method::GET, "/api/orders/17/", Requester::Anonymous),
        Decision::Allow
    );
    assert_eq!(
        check(&table, Method::PATCH, "/api/orders/17/", Requester::Anonymous),
        Decision::Deny(Denial::Unauthorized)
    );
}
