use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;

use crate::error::ResourceError;

/// Semantic node kind -> icon asset path, relative to the resource root.
///
/// Kinds follow the `provider.category.component` convention. The table only
/// maps identities; whether the asset file exists is the resource bundle's
/// problem, surfaced by the layout engine.
static ICON_REGISTRY: Lazy<BTreeMap<&'static str, &'static str>> = Lazy::new(|| {
    BTreeMap::from([
        // generic
        ("generic.blank", "generic/blank.png"),
        ("generic.device.mobile", "generic/device/mobile.png"),
        ("generic.device.tablet", "generic/device/tablet.png"),
        // onprem
        ("onprem.client.client", "onprem/client/client.png"),
        ("onprem.client.user", "onprem/client/user.png"),
        ("onprem.client.users", "onprem/client/users.png"),
        ("onprem.compute.server", "onprem/compute/server.png"),
        ("onprem.container.docker", "onprem/container/docker.png"),
        ("onprem.database.mysql", "onprem/database/mysql.png"),
        ("onprem.database.postgresql", "onprem/database/postgresql.png"),
        ("onprem.inmemory.redis", "onprem/inmemory/redis.png"),
        ("onprem.network.haproxy", "onprem/network/haproxy.png"),
        ("onprem.network.nginx", "onprem/network/nginx.png"),
        ("onprem.network.traefik", "onprem/network/traefik.png"),
        ("onprem.queue.kafka", "onprem/queue/kafka.png"),
        ("onprem.queue.rabbitmq", "onprem/queue/rabbitmq.png"),
        // programming
        ("programming.framework.django", "programming/framework/django.png"),
        ("programming.framework.fastapi", "programming/framework/fastapi.png"),
        ("programming.framework.flask", "programming/framework/flask.png"),
        ("programming.framework.nextjs", "programming/framework/nextjs.png"),
        ("programming.framework.rails", "programming/framework/rails.png"),
        ("programming.framework.react", "programming/framework/react.png"),
        ("programming.framework.vercel", "programming/framework/vercel.png"),
        ("programming.language.python", "programming/language/python.png"),
        ("programming.language.rust", "programming/language/rust.png"),
        // saas
        ("saas.cdn.cloudflare", "saas/cdn/cloudflare.png"),
        ("saas.identity.auth0", "saas/identity/auth0.png"),
        ("saas.identity.okta", "saas/identity/okta.png"),
        // aws
        ("aws.compute.ec2", "aws/compute/ec2.png"),
        ("aws.compute.lambda", "aws/compute/lambda.png"),
        ("aws.database.rds", "aws/database/rds.png"),
        ("aws.network.elb", "aws/network/elb.png"),
        ("aws.storage.s3", "aws/storage/s3.png"),
        // gcp
        ("gcp.compute.gce", "gcp/compute/gce.png"),
        ("gcp.compute.run", "gcp/compute/run.png"),
        ("gcp.database.sql", "gcp/database/sql.png"),
        ("gcp.ml.vertexai", "gcp/ml/vertexai.png"),
        ("gcp.storage.gcs", "gcp/storage/gcs.png"),
    ])
});

/// Resolve a node kind to the icon path used in the rendered diagram.
///
/// A missing mapping is a configuration error at declaration time, before any
/// rendering is attempted.
pub fn resolve(kind: &str, resource_dir: &Path) -> Result<PathBuf, ResourceError> {
    let relative = ICON_REGISTRY
        .get(kind)
        .ok_or_else(|| ResourceError::UnknownKind(kind.to_string()))?;
    Ok(resource_dir.join(relative))
}

/// All registered kinds, sorted. Exposed for discoverability (`--list-kinds`).
pub fn known_kinds() -> impl Iterator<Item = &'static str> {
    ICON_REGISTRY.keys().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_registered_kind_under_resource_dir() {
        let path = resolve("onprem.database.postgresql", Path::new("assets")).unwrap();
        assert_eq!(path, PathBuf::from("assets/onprem/database/postgresql.png"));
    }

    #[test]
    fn unknown_kind_is_a_resource_error() {
        let err = resolve("onprem.database.mongodb", Path::new("assets")).unwrap_err();
        assert!(matches!(err, ResourceError::UnknownKind(kind) if kind == "onprem.database.mongodb"));
    }

    #[test]
    fn kinds_are_sorted_and_unique() {
        let kinds: Vec<_> = known_kinds().collect();
        let mut sorted = kinds.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(kinds, sorted);
    }
}
