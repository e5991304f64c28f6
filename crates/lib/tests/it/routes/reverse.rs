use storefront::routes::{RouteError, RouteTable};

#[test]
fn test_reverse_static_and_parameterized() {
    let table = RouteTable::store_api().unwrap();

    assert_eq!(table.reverse("cart-list", &[]).unwrap(), "/api/cart/");
    assert_eq!(
        table.reverse("order-detail", &[("pk", "42")]).unwrap(),
        "/api/orders/42/"
    );
    assert_eq!(
        table
            .reverse("tag_products_api", &[("slug", "summer-sale")])
            .unwrap(),
        "/api/tags/summer-sale/products/"
    );
}

#[test]
fn test_reverse_resolves_back() {
    let table = RouteTable::store_api().unwrap();
    for route in table.iter() {
        let params: Vec<(&str, &str)> = route.params().map(|(name, _)| (name, "7")).collect();
        let path = table.reverse(route.name(), &params).unwrap();
        let matched = table.resolve(&path).unwrap();
        assert_eq!(matched.name(), route.name(), "{path}");
    }
}

#[test]
fn test_reverse_errors() {
    let table = RouteTable::store_api().unwrap();

    let err = table.reverse("no-such-route", &[]).unwrap_err();
    assert!(err.is_not_found());

    let err = table.reverse("order-detail", &[]).unwrap_err();
    assert!(matches!(err, RouteError::MissingParameter { ref param, .. } if param == "pk"));

    let err = table.reverse("order-detail", &[("pk", "abc")]).unwrap_err();
    assert!(matches!(
        err,
        RouteError::InvalidParameter {
            converter: "int",
            ..
        }
    ));

    let err = table.reverse("cart-list", &[("pk", "1")]).unwrap_err();
    assert!(matches!(err, RouteError::UnexpectedParameter { .. }));

    let err = table
        .reverse("tag_detail_api", &[("slug", "no spaces")])
        .unwrap_err();
    assert!(err.is_validation_error());
}

#[test]
fn test_route_errors_convert_to_crate_error() {
    let table = RouteTable::store_api().unwrap();
    let err: storefront::Error = table.reverse("missing", &[]).unwrap_err().into();
    assert!(err.is_not_found());
    assert_eq!(err.module(), "routes");
}
