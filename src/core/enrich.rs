//! Request enrichment
//!
//! Fills the parts of a [`CanonicalRequest`] that need collaborator lookups, as
//! dictated by its [`FieldFlags`](crate::domain::FieldFlags), plus the locally
//! derived customer reference.

use crate::adapters::traits::{CourierLookup, RefIdLookup};
use crate::domain::request::non_blank;
use crate::domain::{CanonicalRequest, Result};

/// Branch-qualified customer reference
///
/// `None` when either input is blank. A customer id already carrying the branch
/// prefix is returned unchanged, otherwise the branch code is prepended.
///
/// # Examples
///
/// ```
/// use tntrace::core::enrich::customer_reference;
///
/// assert_eq!(customer_reference(Some("BR"), Some("BR12345")).as_deref(), Some("BR12345"));
/// assert_eq!(customer_reference(Some("BR"), Some("123")).as_deref(), Some("BR123"));
/// assert_eq!(customer_reference(None, None), None);
/// ```
pub fn customer_reference(branch_code: Option<&str>, customer_id: Option<&str>) -> Option<String> {
    let branch = branch_code.map(str::trim).filter(|b| !b.is_empty())?;
    let customer = customer_id.map(str::trim).filter(|c| !c.is_empty())?;

    if customer.starts_with(branch) {
        Some(customer.to_string())
    } else {
        Some(format!("{branch}{customer}"))
    }
}

/// Resolves the reference id through the merchant file reference
///
/// Leaves the request untouched when the lookup finds nothing.
pub async fn resolve_ref_id_from_mfr(
    request: &mut CanonicalRequest,
    lookup: &dyn RefIdLookup,
) -> Result<()> {
    let Some(mfr) = non_blank(&request.mfr) else {
        return Ok(());
    };
    let branch = request.branch_code.as_deref().unwrap_or_default();
    let country = request.country_code.as_deref().unwrap_or_default();

    if let Some(ref_id) = lookup.ref_id_by_mfr(branch, country, mfr).await? {
        tracing::debug!(mfr = %mfr, ref_id = %ref_id, "Reference id resolved through MFR");
        request.ref_id_mfr = Some(ref_id);
    }
    Ok(())
}

/// Looks up the courier registered for the request's event
pub async fn resolve_courier(
    request: &mut CanonicalRequest,
    lookup: &dyn CourierLookup,
) -> Result<()> {
    let Some(event_id) = non_blank(&request.event_id) else {
        return Ok(());
    };
    let branch = request.branch_code.as_deref().unwrap_or_default();
    let country = request.country_code.as_deref().unwrap_or_default();

    request.courier = lookup.courier_details(branch, country, event_id).await?;
    Ok(())
}

/// Runs every enrichment the request's flags call for
pub async fn enrich(
    request: &mut CanonicalRequest,
    couriers: &dyn CourierLookup,
    ref_ids: &dyn RefIdLookup,
) -> Result<()> {
    request.customer_reference = customer_reference(
        request.branch_code.as_deref(),
        request.customer_id.as_deref(),
    );

    if request.flags.ref_id_lookup_needed {
        resolve_ref_id_from_mfr(request, ref_ids).await?;
    }
    if request.flags.courier_lookup_needed {
        resolve_courier(request, couriers).await?;
    }
    Ok(())
}
