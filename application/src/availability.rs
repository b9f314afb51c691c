//! Availability probe.
//!
//! Determines which registered models are usable right now: local-only
//! profiles need the local runtime to answer a liveness check, cloud
//! profiles need a credential for their provider. The probe runs fresh
//! for every selection call — credentials and runtimes change between
//! calls, so nothing here is cached.

use crate::ports::{CredentialStore, ModelInvoker};
use conclave_domain::{AvailabilitySnapshot, CapabilityRegistry, ModelProfile};
use futures::future::join_all;
use tracing::debug;

/// Build an availability snapshot for one selection or tournament call.
pub async fn probe<I, C>(
    registry: &CapabilityRegistry,
    invoker: &I,
    credentials: &C,
) -> AvailabilitySnapshot
where
    I: ModelInvoker + ?Sized,
    C: CredentialStore + ?Sized,
{
    let checks = registry
        .all()
        .iter()
        .map(|profile| async move {
            let usable = is_available(profile, invoker, credentials).await;
            (profile.id.clone(), usable)
        });

    let mut available = Vec::new();
    for (id, usable) in join_all(checks).await {
        if usable {
            available.push(id);
        } else {
            debug!("model {} unavailable, excluded from candidacy", id);
        }
    }

    AvailabilitySnapshot::new(available)
}

async fn is_available<I, C>(profile: &ModelProfile, invoker: &I, credentials: &C) -> bool
where
    I: ModelInvoker + ?Sized,
    C: CredentialStore + ?Sized,
{
    if profile.local_only {
        return invoker.is_reachable(profile).await;
    }
    if profile.requires_credential {
        return credentials.has_credential(&profile.provider);
    }
    true
}
