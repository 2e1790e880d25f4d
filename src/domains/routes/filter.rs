//! Route Filter - decides which registered routes become tools.

use std::fmt;
use std::sync::Arc;

use super::descriptor::{HttpMethod, RouteDescriptor};
use crate::core::config::ToolsConfig;

/// Custom predicate. Returning `false` drops the route.
pub type RoutePredicate = Arc<dyn Fn(&RouteDescriptor) -> bool + Send + Sync>;

/// Filter applied to the registry on every catalogue request.
#[derive(Clone, Default)]
pub struct RouteFilter {
    skip_head_routes: bool,
    skip_options_routes: bool,
    predicate: Option<RoutePredicate>,
}

impl RouteFilter {
    /// Build a filter from the tools configuration.
    pub fn new(config: &ToolsConfig) -> Self {
        Self {
            skip_head_routes: config.skip_head_routes,
            skip_options_routes: config.skip_options_routes,
            predicate: None,
        }
    }

    /// Install a custom predicate.
    pub fn with_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&RouteDescriptor) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    /// Whether a single route survives the filter.
    pub fn accepts(&self, route: &RouteDescriptor) -> bool {
        if self.skip_head_routes && route.has_method(HttpMethod::Head) {
            return false;
        }
        if self.skip_options_routes && route.has_method(HttpMethod::Options) {
            return false;
        }
        self.predicate
            .as_ref()
            .is_none_or(|predicate| predicate(route))
    }

    /// Apply the filter, keeping relative order.
    pub fn filter_routes(&self, routes: &[Arc<RouteDescriptor>]) -> Vec<Arc<RouteDescriptor>> {
        routes
            .iter()
            .filter(|route| self.accepts(route))
            .cloned()
            .collect()
    }
}

impl fmt::Debug for RouteFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteFilter")
            .field("skip_head_routes", &self.skip_head_routes)
            .field("skip_options_routes", &self.skip_options_routes)
            .field("predicate", &self.predicate.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
