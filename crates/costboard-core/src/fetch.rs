//! Fetch collaborators and the entitlement loader
//!
//! Transport is left to the caller: anything that can turn a path and a
//! query string into a report or a user-access payload implements one of
//! the traits below. The loader issues its three user-access queries
//! concurrently and folds them into a single [`EntitlementStatus`].

use anyhow::{Context, Result};
use std::future::Future;

use costboard_types::{
    AccessType, EntitlementRecord, EntitlementStatus, ProviderType, RawReport, ReportType,
    UserAccess, UserAccessData,
};

use crate::analytics::merge_pages;
use crate::query::{user_access_query, ReportQuery};

/// Source of report pages
pub trait ReportFetcher: Sync {
    fn fetch_report(
        &self,
        provider: ProviderType,
        report_type: ReportType,
        query: &str,
    ) -> impl Future<Output = Result<RawReport>> + Send;
}

/// Source of user-access payloads
pub trait EntitlementFetcher: Sync {
    fn fetch_user_access(
        &self,
        kind: AccessType,
        query: &str,
    ) -> impl Future<Output = Result<UserAccess>> + Send;
}

/// Fetch a report and follow its pagination, up to `max_pages` pages
///
/// Pages are requested one after another, each at the offset reached by
/// the rows already received, and joined with [`merge_pages`].
pub async fn fetch_report_pages<F>(
    fetcher: &F,
    provider: ProviderType,
    report_type: ReportType,
    query: &ReportQuery,
    max_pages: usize,
) -> Result<RawReport>
where
    F: ReportFetcher + ?Sized,
{
    let mut pages = Vec::new();
    let mut offset = query.offset.unwrap_or(0);

    for page_number in 0..max_pages.max(1) {
        let page_query = query.clone().offset(offset);
        let page = fetcher
            .fetch_report(provider, report_type, &page_query.to_query_string())
            .await
            .with_context(|| {
                format!("Failed to fetch {provider} report page {}", page_number + 1)
            })?;

        let received = page.data.len() as u64;
        let more = page.has_next_page() && received > 0;
        pages.push(page);

        if !more {
            break;
        }
        offset += received;
    }

    tracing::debug!(
        provider = %provider,
        pages = pages.len(),
        "Fetched paginated report"
    );

    Ok(merge_pages(pages))
}

/// Load the user's entitlements
///
/// Issues the combined `all` query and the per-provider `gcp`/`ibm` beta
/// queries concurrently. A failed `all` query makes the snapshot
/// `Unavailable`; a failed provider query only withholds that provider.
pub async fn load_entitlements<F>(fetcher: &F) -> EntitlementStatus
where
    F: EntitlementFetcher + ?Sized,
{
    let all_query = user_access_query(AccessType::All, false);
    let gcp_query = user_access_query(AccessType::Gcp, true);
    let ibm_query = user_access_query(AccessType::Ibm, true);

    let (all, gcp, ibm) = tokio::join!(
        fetcher.fetch_user_access(AccessType::All, &all_query),
        fetcher.fetch_user_access(AccessType::Gcp, &gcp_query),
        fetcher.fetch_user_access(AccessType::Ibm, &ibm_query),
    );

    let mut records = match all {
        Ok(access) => match access.data {
            UserAccessData::Records(records) => records,
            UserAccessData::Flag(flag) => {
                tracing::warn!(flag, "Combined user-access query returned a bare flag, ignoring");
                Vec::new()
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "User-access query failed");
            return EntitlementStatus::Unavailable;
        }
    };

    records.extend(provider_records(AccessType::Gcp, gcp));
    records.extend(provider_records(AccessType::Ibm, ibm));

    tracing::debug!(count = records.len(), "Loaded entitlements");
    EntitlementStatus::Loaded(records)
}

/// Records contributed by one boolean-style provider query
fn provider_records(kind: AccessType, result: Result<UserAccess>) -> Vec<EntitlementRecord> {
    match result {
        Ok(access) => match access.data {
            UserAccessData::Flag(flag) => vec![EntitlementRecord::record(kind, flag)],
            UserAccessData::Records(records) => records,
        },
        Err(e) => {
            tracing::warn!(kind = %kind, error = %e, "User-access query failed, treating as not entitled");
            Vec::new()
        }
    }
}
