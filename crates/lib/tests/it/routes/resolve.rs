use storefront::routes::{AccessRequirement, ParamValue, RouteTable};

fn table() -> RouteTable {
    RouteTable::store_api().expect("store API table should build")
}

#[test]
fn test_resolve_named_routes() {
    let table = table();
    let cases = [
        ("/api/products/", "product-list"),
        ("/api/products/12/", "product-detail"),
        ("/api/categories/", "category-list"),
        ("/api/categories/3/", "category-detail"),
        ("/api/categories/shoes/products/", "category_products_api"),
        ("/api/tags/", "tag_list_api"),
        ("/api/tags/summer-sale/", "tag_detail_api"),
        ("/api/tags/summer-sale/products/", "tag_products_api"),
        ("/api/search/", "search_api"),
        ("/api/search/suggestions/", "search_suggestions_api"),
        ("/api/products/red-shoes/reviews/", "product_reviews_api"),
        ("/api/reviews/", "review_create_api"),
        ("/api/wishlist/", "wishlist-list"),
        ("/api/wishlist/add/", "wishlist-add"),
        ("/api/wishlist/remove/", "wishlist-remove"),
        ("/api/cart/", "cart-list"),
        ("/api/cart/add/", "cart-add"),
        ("/api/cart/update/", "cart-update"),
        ("/api/cart/remove/", "cart-remove"),
        ("/api/cart/clear/", "cart-clear"),
        ("/api/cart/count/", "cart_count_api"),
        ("/api/orders/", "order-list"),
        ("/api/orders/9/", "order-detail"),
        ("/api/addresses/", "address_list_api"),
        ("/api/payment-methods/", "payment_method_list_api"),
        ("/api/stats/products/", "product_stats_api"),
        ("/api/stats/categories/", "category_stats_api"),
        ("/api/health/", "health_check_api"),
    ];

    for (path, name) in cases {
        let matched = table.resolve(path).unwrap_or_else(|| panic!("{path} did not resolve"));
        assert_eq!(matched.name(), name, "{path}");
    }
    assert_eq!(cases.len(), table.len());
}

#[test]
fn test_trailing_slash_optional() {
    let table = table();
    assert_eq!(table.resolve("/api/cart").unwrap().name(), "cart-list");
    assert_eq!(table.resolve("/api/orders/4").unwrap().name(), "order-detail");
}

#[test]
fn test_typed_parameters() {
    let table = table();

    let detail = table.resolve("/api/products/12/").unwrap();
    assert_eq!(detail.param("pk"), Some(&ParamValue::Int(12)));
    assert_eq!(detail.object_key(), Some(12));

    let reviews = table.resolve("/api/products/red-shoes/reviews/").unwrap();
    assert_eq!(reviews.param("slug").and_then(ParamValue::as_str), Some("red-shoes"));
    assert_eq!(reviews.object_key(), None);
}

#[test]
fn test_int_converter_rejects_non_digits() {
    let table = table();
    assert!(table.resolve("/api/orders/abc/").is_none());
    assert!(table.resolve("/api/orders/-1/").is_none());
    assert!(table.resolve("/api/products/1.5/").is_none());
}

#[test]
fn test_first_match_wins() {
    let table = table();
    // Digits are valid slugs too, but the int pattern comes first
    let matched = table.resolve("/api/categories/5/").unwrap();
    assert_eq!(matched.name(), "category-detail");

    let matched = table.resolve("/api/categories/5/products/").unwrap();
    assert_eq!(matched.name(), "category_products_api");
    assert_eq!(matched.param("slug"), Some(&ParamValue::Slug("5".to_string())));
}

#[test]
fn test_unknown_paths() {
    let table = table();
    for path in [
        "/api/nope/",
        "/api/cart/add/extra/",
        "/api//cart/",
        "/cart/",
        "api/cart/",
        "/api/tags/bad slug/",
    ] {
        assert!(table.resolve(path).is_none(), "{path} should not resolve");
    }
}

#[test]
fn test_access_requirements() {
    let table = table();
    assert_eq!(
        table.get("product-list").unwrap().access(),
        AccessRequirement::Public
    );
    assert_eq!(table.get("order-detail").unwrap().access(), AccessRequirement::Gated);
    assert!(table.resolve("/api/payment-methods/").unwrap().is_gated());
    assert!(!table.resolve("/api/health/").unwrap().is_gated());
}
