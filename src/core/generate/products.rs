//! Built-in product strategies

use super::{DocumentStrategy, ProductDetail};
use crate::domain::{CanonicalRequest, TxnRecord};
use std::sync::Arc;

/// Import letter of credit
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportLetterOfCredit;

impl DocumentStrategy for ImportLetterOfCredit {
    fn product_code(&self) -> &str {
        "IMLC"
    }

    fn document_root(&self) -> &'static str {
        "ImportLcTrackTrace"
    }

    fn product_details(&self, record: &TxnRecord, request: &CanonicalRequest) -> Vec<ProductDetail> {
        // LCs raised against an MFR carry the resolved reference as the LC number
        let lc_reference = request.ref_id_mfr.clone().or_else(|| request.ref_id.clone());
        vec![
            ProductDetail::new("LcReference", lc_reference),
            ProductDetail::new("Applicant", record.customer_reference.clone()),
            ProductDetail::new("LcCurrency", record.currency.clone()),
        ]
    }
}

/// Export documentary collection
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportCollection;

impl DocumentStrategy for ExportCollection {
    fn product_code(&self) -> &str {
        "EXCO"
    }

    fn document_root(&self) -> &'static str {
        "ExportCollectionTrackTrace"
    }

    fn product_details(&self, record: &TxnRecord, request: &CanonicalRequest) -> Vec<ProductDetail> {
        vec![
            ProductDetail::new("CollectionReference", record.txn_id.clone()),
            ProductDetail::new("Drawer", record.customer_reference.clone()),
            ProductDetail::new("Mfr", request.mfr.clone()),
            ProductDetail::new("Umfr", request.umfr.clone()),
        ]
    }
}

/// Outward guarantee
#[derive(Debug, Clone, Copy, Default)]
pub struct OutwardGuarantee;

impl DocumentStrategy for OutwardGuarantee {
    fn product_code(&self) -> &str {
        "OWGT"
    }

    fn document_root(&self) -> &'static str {
        "GuaranteeTrackTrace"
    }

    fn product_details(&self, record: &TxnRecord, request: &CanonicalRequest) -> Vec<ProductDetail> {
        vec![
            ProductDetail::new(
                "GuaranteeReference",
                request.ref_id.clone().or_else(|| request.ref_id_mfr.clone()),
            ),
            ProductDetail::new("Principal", record.customer_reference.clone()),
            ProductDetail::new("ContextStatus", record.ctx_status_code.clone()),
        ]
    }
}

/// Every built-in strategy
pub fn default_strategies() -> Vec<Arc<dyn DocumentStrategy>> {
    vec![
        Arc::new(ImportLetterOfCredit),
        Arc::new(ExportCollection),
        Arc::new(OutwardGuarantee),
    ]
}
