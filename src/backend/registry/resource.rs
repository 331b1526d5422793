/**
 * Registered Resource
 *
 * A `Resource` binds one `Collection` to a name, a permission resolver and
 * two projections applied to read responses:
 *
 * - `pick` shapes a single record before it is returned
 * - `filter` shapes the permitted record list before it is returned
 *
 * Both default to the identity function.
 */

use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::backend::permission::{PermissionPolicy, PermissionResolver, RequestContext};
use crate::backend::store::Collection;

/// Projection applied to a single record read
pub type PickFn = Arc<dyn Fn(&RequestContext, Value) -> Value + Send + Sync>;

/// Projection applied to a collection read
pub type FilterFn = Arc<dyn Fn(&RequestContext, Vec<Value>) -> Vec<Value> + Send + Sync>;

/// How to register a collection
#[derive(Clone)]
pub struct ResourceOptions {
    pub(crate) name_regex: Option<Regex>,
    pub(crate) policy: PermissionPolicy,
    pub(crate) pick: Option<PickFn>,
    pub(crate) filter: Option<FilterFn>,
    pub(crate) assign_routes: bool,
}

impl Default for ResourceOptions {
    fn default() -> Self {
        Self {
            name_regex: None,
            policy: PermissionPolicy::Open,
            pick: None,
            filter: None,
            assign_routes: true,
        }
    }
}

impl fmt::Debug for ResourceOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceOptions")
            .field("name_regex", &self.name_regex.as_ref().map(Regex::as_str))
            .field("policy", &self.policy)
            .field("pick", &self.pick.is_some())
            .field("filter", &self.filter.is_some())
            .field("assign_routes", &self.assign_routes)
            .finish()
    }
}

impl ResourceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name the resource after capture group 1 of `regex` matched on the URL
    pub fn name_regex(mut self, regex: Regex) -> Self {
        self.name_regex = Some(regex);
        self
    }

    pub fn permissions(mut self, policy: PermissionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn pick<F>(mut self, pick: F) -> Self
    where
        F: Fn(&RequestContext, Value) -> Value + Send + Sync + 'static,
    {
        self.pick = Some(Arc::new(pick));
        self
    }

    pub fn filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&RequestContext, Vec<Value>) -> Vec<Value> + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    /// Register without HTTP routes
    pub fn without_routes(mut self) -> Self {
        self.assign_routes = false;
        self
    }
}

/// A collection exposed over HTTP
pub struct Resource {
    name: String,
    collection: Arc<Collection>,
    resolver: PermissionResolver,
    pick: Option<PickFn>,
    filter: Option<FilterFn>,
    assign_routes: bool,
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("name", &self.name)
            .field("url", &self.collection.url())
            .field("policy", self.resolver.policy())
            .field("assign_routes", &self.assign_routes)
            .finish()
    }
}

impl Resource {
    pub(crate) fn new(name: String, collection: Arc<Collection>, options: ResourceOptions) -> Self {
        Self {
            name,
            collection,
            resolver: PermissionResolver::new(options.policy),
            pick: options.pick,
            filter: options.filter,
            assign_routes: options.assign_routes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        self.collection.url()
    }

    pub fn id_attribute(&self) -> &str {
        self.collection.id_attribute()
    }

    pub fn collection(&self) -> &Arc<Collection> {
        &self.collection
    }

    pub fn resolver(&self) -> &PermissionResolver {
        &self.resolver
    }

    pub fn assign_routes(&self) -> bool {
        self.assign_routes
    }

    /// Shape a single record for a read response
    pub fn pick(&self, context: &RequestContext, record: Value) -> Value {
        match &self.pick {
            Some(pick) => pick(context, record),
            None => record,
        }
    }

    /// Shape the permitted records for a collection read
    pub fn filter(&self, context: &RequestContext, records: Vec<Value>) -> Vec<Value> {
        match &self.filter {
            Some(filter) => filter(context, records),
            None => records,
        }
    }
}
