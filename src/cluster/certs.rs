//! Generated certificate files purged on cluster reset

use crate::PROGRAM;
use std::path::{Path, PathBuf};

/// Certificates and keys under `<data_dir>/tls`
const TLS_FILES: &[&str] = &[
    "client-ca.crt",
    "client-ca.key",
    "server-ca.crt",
    "server-ca.key",
    "request-header-ca.crt",
    "request-header-ca.key",
    "service.key",
    "client-admin.crt",
    "client-admin.key",
    "client-controller.crt",
    "client-controller.key",
    "client-cloud-controller.crt",
    "client-cloud-controller.key",
    "client-scheduler.crt",
    "client-scheduler.key",
    "client-kube-apiserver.crt",
    "client-kube-apiserver.key",
    "client-kube-proxy.crt",
    "client-kube-proxy.key",
    "serving-kube-apiserver.crt",
    "serving-kube-apiserver.key",
    "client-kubelet.key",
    "serving-kubelet.key",
    "client-auth-proxy.key",
];

/// Certificates and keys under `<data_dir>/tls/etcd`
const ETCD_TLS_FILES: &[&str] = &[
    "server-ca.crt",
    "server-ca.key",
    "peer-ca.crt",
    "peer-ca.key",
    "server-client.crt",
    "server-client.key",
    "peer-server-client.crt",
    "peer-server-client.key",
    "client.crt",
    "client.key",
];

/// Every certificate artifact a reset must remove
pub fn certificate_artifacts(data_dir: &Path) -> Vec<PathBuf> {
    let tls = data_dir.join("tls");
    let etcd = tls.join("etcd");

    let mut paths: Vec<PathBuf> = TLS_FILES.iter().map(|f| tls.join(f)).collect();
    paths.push(tls.join(format!("client-{}-controller.crt", PROGRAM)));
    paths.push(tls.join(format!("client-{}-controller.key", PROGRAM)));
    paths.extend(ETCD_TLS_FILES.iter().map(|f| etcd.join(f)));
    paths
}

/// Best-effort removal; missing files and failed deletions are ignored.
///
/// Uses blocking `std::fs` since it backs the synchronous
/// [`ResetHooks::clean_certs`] callback.
///
/// [`ResetHooks::clean_certs`]: crate::cluster::ResetHooks::clean_certs
pub fn clean_certs(data_dir: &Path) {
    for cert in certificate_artifacts(data_dir) {
        let _ = std::fs::remove_file(cert);
    }
}
