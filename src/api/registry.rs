//! Route modules and the aggregator that mounts them under a prefix
//!
//! A [`RouteModule`] is a named, ordered list of routes. [`RouterAggregator`]
//! mounts modules under a path prefix with documentation tags, validates the
//! composed route table and produces both the axum router and the OpenAPI
//! document for it.

use std::collections::HashMap;

use axum::{
    handler::Handler,
    http::Method,
    routing::{self, MethodRouter},
    Router,
};
use tracing::{debug, info};
use utoipa::openapi::{tag::TagBuilder, OpenApi};

use crate::error::{AppError, Result};

/// A single registered route inside a module
struct RouteEntry<S> {
    method: Method,
    path: String,
    handler: MethodRouter<S>,
}

/// A named group of routes, registered relative to wherever it gets mounted
pub struct RouteModule<S = ()> {
    name: String,
    entries: Vec<RouteEntry<S>>,
    docs: Option<OpenApi>,
}

impl<S> RouteModule<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            docs: None,
        }
    }

    pub fn get<H, T>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.push(Method::GET, path, routing::get(handler))
    }

    pub fn post<H, T>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.push(Method::POST, path, routing::post(handler))
    }

    pub fn put<H, T>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.push(Method::PUT, path, routing::put(handler))
    }

    pub fn delete<H, T>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.push(Method::DELETE, path, routing::delete(handler))
    }

    /// Attach the OpenAPI fragment documenting this module's handlers.
    /// Fragment paths are relative to the module, like its routes.
    pub fn with_docs(mut self, docs: OpenApi) -> Self {
        self.docs = Some(docs);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(mut self, method: Method, path: &str, handler: MethodRouter<S>) -> Self {
        self.entries.push(RouteEntry {
            method,
            path: path.to_string(),
            handler,
        });
        self
    }
}

/// A module mounted under a prefix
struct Mount<S> {
    prefix: String,
    tags: Vec<String>,
    module: RouteModule<S>,
}

/// Resolved view of one route in the composed table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    pub method: Method,
    pub path: String,
    pub tags: Vec<String>,
    pub module: String,
}

/// Collects route modules and mounts them under prefixes, in registration order
pub struct RouterAggregator<S = ()> {
    mounts: Vec<Mount<S>>,
}

impl<S> RouterAggregator<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self { mounts: Vec::new() }
    }

    /// Register every route of `child` under `prefix`, annotated with `tags`.
    /// Conflicts are reported by [`RouterAggregator::build`].
    pub fn mount(mut self, child: RouteModule<S>, prefix: &str, tags: &[&str]) -> Self {
        self.mounts.push(Mount {
            prefix: prefix.trim_end_matches('/').to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            module: child,
        });
        self
    }

    /// The composed route table, in registration order
    pub fn routes(&self) -> Vec<RouteInfo> {
        self.mounts
            .iter()
            .flat_map(|mount| {
                mount.module.entries.iter().map(move |entry| RouteInfo {
                    method: entry.method.clone(),
                    path: compose_path(&mount.prefix, &entry.path),
                    tags: mount.tags.clone(),
                    module: mount.module.name.clone(),
                })
            })
            .collect()
    }

    /// Check prefixes, route paths and (method, path) uniqueness
    pub fn validate(&self) -> Result<()> {
        let mut seen: HashMap<(Method, String), (String, String)> = HashMap::new();
        // Capture names for one path shape must agree across every method
        let mut shapes: HashMap<String, (String, String)> = HashMap::new();

        for mount in &self.mounts {
            if !mount.prefix.is_empty() && !mount.prefix.starts_with('/') {
                return Err(AppError::RouteConflict(format!(
                    "prefix '{}' of module '{}' must be empty or start with '/'",
                    mount.prefix, mount.module.name
                )));
            }

            for entry in &mount.module.entries {
                if !entry.path.starts_with('/') {
                    return Err(AppError::RouteConflict(format!(
                        "path '{}' in module '{}' must start with '/'",
                        entry.path, mount.module.name
                    )));
                }

                let full_path = compose_path(&mount.prefix, &entry.path);
                let key = (entry.method.clone(), match_key(&full_path));
                if let Some((module, existing)) = seen.get(&key) {
                    return Err(AppError::RouteConflict(format!(
                        "{} {} from module '{}' overlaps {} already registered by module '{}'",
                        entry.method, full_path, mount.module.name, existing, module
                    )));
                }

                match shapes.get(&key.1) {
                    Some((module, existing)) if *existing != full_path => {
                        return Err(AppError::RouteConflict(format!(
                            "{} {} from module '{}' names its captures differently from {} registered by module '{}'",
                            entry.method, full_path, mount.module.name, existing, module
                        )));
                    }
                    Some(_) => {}
                    None => {
                        shapes.insert(
                            key.1.clone(),
                            (mount.module.name.clone(), full_path.clone()),
                        );
                    }
                }

                seen.insert(key, (mount.module.name.clone(), full_path));
            }
        }

        Ok(())
    }

    /// Validate the table and build the axum router
    pub fn build(&self) -> Result<Router<S>> {
        self.validate()?;

        let mut router = Router::new();
        for mount in &self.mounts {
            info!(
                module = %mount.module.name,
                prefix = %mount.prefix,
                tags = ?mount.tags,
                routes = mount.module.len(),
                "Mounting route module"
            );

            for entry in &mount.module.entries {
                let full_path = compose_path(&mount.prefix, &entry.path);
                debug!(method = %entry.method, path = %full_path, "Registered route");
                router = router.route(&full_path, entry.handler.clone());
            }
        }

        Ok(router)
    }

    /// Merge each mounted module's OpenAPI fragment into `base`, with paths
    /// prefixed and operations tagged by their mount
    pub fn openapi(&self, mut base: OpenApi) -> OpenApi {
        for mount in &self.mounts {
            let Some(mut fragment) = mount.module.docs.clone() else {
                continue;
            };

            let relative = std::mem::take(&mut fragment.paths.paths);
            for (path, mut item) in relative {
                if !mount.tags.is_empty() {
                    for operation in item.operations.values_mut() {
                        operation.tags = Some(mount.tags.clone());
                    }
                }
                fragment
                    .paths
                    .paths
                    .insert(compose_path(&mount.prefix, &path), item);
            }

            base.merge(fragment);

            let tags = base.tags.get_or_insert_with(Vec::new);
            for name in &mount.tags {
                if !tags.iter().any(|t| &t.name == name) {
                    tags.push(TagBuilder::new().name(name.clone()).build());
                }
            }
        }

        base
    }
}

impl<S> Default for RouterAggregator<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Join a mount prefix and a module-relative path
pub fn compose_path(prefix: &str, path: &str) -> String {
    let joined = format!("{}{}", prefix.trim_end_matches('/'), path);
    if joined.is_empty() {
        "/".to_string()
    } else {
        joined
    }
}

/// Paths differing only in capture names match the same requests
fn match_key(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if segment.starts_with(':') {
                ":"
            } else if segment.starts_with('*') {
                "*"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
