//! Store API route table
//!
//! An ordered list of named URL patterns under a common prefix. Requests are matched
//! with [`RouteTable::resolve`] (first matching route wins) and URLs are built from a
//! route name with [`RouteTable::reverse`].
//!
//! Each route also records whether its requests go through the access gate
//! ([`crate::access`]). The handlers behind the routes live outside this crate.

mod errors;
mod pattern;

use std::collections::HashSet;

use serde::Serialize;

pub use errors::RouteError;
pub use pattern::{Converter, ParamValue};
use pattern::Pattern;

/// Prefix the store API is mounted under.
pub const API_PREFIX: &str = "/api/";

/// Name of the path parameter that identifies a single object.
pub const OBJECT_KEY: &str = "pk";

/// Whether requests to a route are checked by the access gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessRequirement {
    Public,
    Gated,
}

/// A named URL pattern.
#[derive(Debug, Clone, Serialize)]
pub struct Route {
    name: String,
    pattern: String,
    access: AccessRequirement,
    #[serde(skip)]
    parsed: Pattern,
}

impl Route {
    /// Parse a route. `pattern` is relative to the table prefix, e.g. `"orders/<int:pk>/"`.
    pub fn new(
        name: impl Into<String>,
        pattern: impl Into<String>,
        access: AccessRequirement,
    ) -> Result<Self, RouteError> {
        let pattern = pattern.into();
        let parsed = Pattern::parse(&pattern)?;
        Ok(Self {
            name: name.into(),
            pattern,
            access,
            parsed,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn access(&self) -> AccessRequirement {
        self.access
    }

    pub fn is_gated(&self) -> bool {
        self.access == AccessRequirement::Gated
    }

    /// Parameter names this route captures, in path order.
    pub fn params(&self) -> impl Iterator<Item = (&str, Converter)> {
        self.parsed.captures()
    }
}

/// A resolved request path.
#[derive(Debug, Clone)]
pub struct RouteMatch<'t> {
    route: &'t Route,
    params: Vec<(String, ParamValue)>,
}

impl<'t> RouteMatch<'t> {
    pub fn route(&self) -> &'t Route {
        self.route
    }

    pub fn name(&self) -> &'t str {
        self.route.name()
    }

    pub fn is_gated(&self) -> bool {
        self.route.is_gated()
    }

    pub fn params(&self) -> &[(String, ParamValue)] {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.params.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// The captured object key, for routes that address a single object.
    pub fn object_key(&self) -> Option<u64> {
        self.param(OBJECT_KEY).and_then(ParamValue::as_int)
    }
}

/// Ordered, named URL patterns under a prefix.
#[derive(Debug, Clone)]
pub struct RouteTable {
    prefix: String,
    routes: Vec<Route>,
}

impl RouteTable {
    /// Create an empty table. `prefix` must start and end with `/`.
    pub fn new(prefix: impl Into<String>) -> Result<Self, RouteError> {
        let prefix = prefix.into();
        if !prefix.starts_with('/') || !prefix.ends_with('/') {
            return Err(RouteError::InvalidPattern {
                pattern: prefix,
                reason: "prefix must start and end with '/'".into(),
            });
        }
        Ok(Self {
            prefix,
            routes: Vec::new(),
        })
    }

    /// Append a route. Names must be unique within the table.
    pub fn push(&mut self, route: Route) -> Result<(), RouteError> {
        if self.get(route.name()).is_some() {
            return Err(RouteError::DuplicateName {
                name: route.name,
            });
        }
        self.routes.push(route);
        Ok(())
    }

    fn add(
        mut self,
        name: &str,
        pattern: &str,
        access: AccessRequirement,
    ) -> Result<Self, RouteError> {
        self.push(Route::new(name, pattern, access)?)?;
        Ok(self)
    }

    /// The store API table, mounted at [`API_PREFIX`].
    ///
    /// Wishlist, cart, order, address and payment-method routes are gated.
    pub fn store_api() -> Result<Self, RouteError> {
        use AccessRequirement::{Gated, Public};

        Self::new(API_PREFIX)?
            // Products
            .add("product-list", "products/", Public)?
            .add("product-detail", "products/<int:pk>/", Public)?
            // Categories
            .add("category-list", "categories/", Public)?
            .add("category-detail", "categories/<int:pk>/", Public)?
            .add("category_products_api", "categories/<slug:slug>/products/", Public)?
            // Tags
            .add("tag_list_api", "tags/", Public)?
            .add("tag_detail_api", "tags/<slug:slug>/", Public)?
            .add("tag_products_api", "tags/<slug:slug>/products/", Public)?
            // Search
            .add("search_api", "search/", Public)?
            .add("search_suggestions_api", "search/suggestions/", Public)?
            // Reviews
            .add("product_reviews_api", "products/<slug:slug>/reviews/", Public)?
            .add("review_create_api", "reviews/", Public)?
            // Wishlist
            .add("wishlist-list", "wishlist/", Gated)?
            .add("wishlist-add", "wishlist/add/", Gated)?
            .add("wishlist-remove", "wishlist/remove/", Gated)?
            // Cart
            .add("cart-list", "cart/", Gated)?
            .add("cart-add", "cart/add/", Gated)?
            .add("cart-update", "cart/update/", Gated)?
            .add("cart-remove", "cart/remove/", Gated)?
            .add("cart-clear", "cart/clear/", Gated)?
            .add("cart_count_api", "cart/count/", Gated)?
            // Orders
            .add("order-list", "orders/", Gated)?
            .add("order-detail", "orders/<int:pk>/", Gated)?
            // Addresses and payment methods
            .add("address_list_api", "addresses/", Gated)?
            .add("payment_method_list_api", "payment-methods/", Gated)?
            // Statistics
            .add("product_stats_api", "stats/products/", Public)?
            .add("category_stats_api", "stats/categories/", Public)?
            // Monitoring
            .add("health_check_api", "health/", Public)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    /// Look up a route by name.
    pub fn get(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.name == name)
    }

    /// Match an absolute request path (without query string).
    ///
    /// Routes are tried in table order; the first match wins. The trailing slash is
    /// optional.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch<'_>> {
        let relative = path.strip_prefix(self.prefix.as_str())?;

        self.routes.iter().find_map(|route| {
            route
                .parsed
                .matches(relative)
                .map(|params| RouteMatch { route, params })
        })
    }

    /// Build the absolute path for a named route.
    ///
    /// `params` must supply exactly the parameters the route captures, each
    /// satisfying its converter.
    pub fn reverse(&self, name: &str, params: &[(&str, &str)]) -> Result<String, RouteError> {
        let route = self.get(name).ok_or_else(|| RouteError::UnknownRoute {
            name: name.to_string(),
        })?;

        let captured: HashSet<&str> = route.params().map(|(n, _)| n).collect();
        if let Some((extra, _)) = params.iter().find(|(n, _)| !captured.contains(n)) {
            return Err(RouteError::UnexpectedParameter {
                route: route.name.clone(),
                param: extra.to_string(),
            });
        }

        let mut values = Vec::with_capacity(captured.len());
        for (param, converter) in route.params() {
            let (_, value) = params.iter().find(|(n, _)| *n == param).ok_or_else(|| {
                RouteError::MissingParameter {
                    route: route.name.clone(),
                    param: param.to_string(),
                }
            })?;
            let converted =
                converter
                    .convert(value)
                    .ok_or_else(|| RouteError::InvalidParameter {
                        route: route.name.clone(),
                        param: param.to_string(),
                        value: value.to_string(),
                        converter: converter.as_str(),
                    })?;
            values.push((param, converted));
        }

        let relative = route.parsed.render(|param| {
            values
                .iter()
                .find(|(n, _)| *n == param)
                .map(|(_, v)| v.to_string())
                .unwrap_or_default()
        });
        Ok(format!("{}{relative}", self.prefix))
    }
}
