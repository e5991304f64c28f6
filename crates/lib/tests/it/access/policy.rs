use axum::http::Method;
use storefront::{
    access::{
        Decision, Denial, OperationKind, RequestContext, Requester, has_object_permission,
        has_permission,
    },
    account::AccountId,
};

fn requesters() -> Vec<Requester> {
    vec![
        Requester::Authenticated(AccountId::generate()),
        Requester::Anonymous,
        // A malformed or unknown session resolves to no account
        Requester::from(None),
    ]
}

fn safe_methods() -> Vec<Method> {
    vec![Method::GET, Method::HEAD, Method::OPTIONS]
}

fn unsafe_methods() -> Vec<Method> {
    vec![Method::POST, Method::PUT, Method::PATCH, Method::DELETE]
}

#[test]
fn test_safe_methods_always_allowed() {
    for method in &safe_methods() {
        for requester in requesters() {
            let ctx = RequestContext::from_method(method, requester.clone());
            assert_eq!(
                has_permission(&ctx),
                Decision::Allow,
                "{method} as {requester:?}"
            );
        }
    }
}

#[test]
fn test_unsafe_methods_allowed_when_authenticated() {
    let requester = Requester::Authenticated(AccountId::generate());
    for method in &unsafe_methods() {
        let ctx = RequestContext::from_method(method, requester.clone());
        assert!(has_permission(&ctx).is_allowed(), "{method}");
    }
}

#[test]
fn test_unsafe_methods_denied_as_unauthorized_when_anonymous() {
    for method in &unsafe_methods() {
        let ctx = RequestContext::from_method(method, Requester::Anonymous);
        let decision = has_permission(&ctx);
        assert_eq!(decision, Decision::Deny(Denial::Unauthorized), "{method}");
        assert_ne!(decision.denial(), Some(Denial::Forbidden));
    }
}

#[test]
fn test_extension_methods_are_unsafe() {
    let method = Method::from_bytes(b"PURGE").unwrap();
    assert_eq!(OperationKind::from_method(&method), OperationKind::Unsafe);

    let ctx = RequestContext::from_method(&method, Requester::Anonymous);
    assert_eq!(has_permission(&ctx).denial(), Some(Denial::Unauthorized));
}

#[test]
fn test_object_check_matches_collection_check() {
    let objects: [&dyn std::fmt::Debug; 4] = [&42u64, &"order", &(), &vec![1, 2, 3]];

    for method in &[safe_methods(), unsafe_methods()].concat() {
        for requester in requesters() {
            let ctx = RequestContext::from_method(method, requester);
            let expected = has_permission(&ctx);
            for object in objects {
                assert_eq!(has_object_permission(&ctx, object), expected);
            }
            assert_eq!(has_object_permission(&ctx, "unsized str"), expected);
        }
    }
}

#[test]
fn test_decision_into_result() {
    assert_eq!(Decision::Allow.into_result(), Ok(()));
    assert_eq!(
        Decision::Deny(Denial::Unauthorized).into_result(),
        Err(Denial::Unauthorized)
    );
}
